use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error(
        "***** Docker not installed / correctly setup / running.\n      \
         Are you able to run '{0} info'?"
    )]
    DaemonUnavailable(String),

    #[error("Recipe to run {0} not available.")]
    PackageNotFound(String),

    #[error("failed to build image {0}")]
    BuildFailed(String),

    #[error("runtime error: {0}")]
    Runtime(#[from] oswitch_core::RuntimeError),

    #[error("mount resolution failed: {0}")]
    Mount(#[from] oswitch_mount::MountError),

    #[error("image lookup failed: {0}")]
    Image(#[from] oswitch_image::ImageError),

    #[error("build context error: {0}")]
    Context(#[from] oswitch_context::ContextError),
}

impl SwitchError {
    /// Errors the user can act on, reported without diagnostics.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SwitchError::DaemonUnavailable(_) | SwitchError::PackageNotFound(_)
        )
    }
}
