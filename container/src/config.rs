use oswitch_core::DEFAULT_RUNTIME;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Build contexts live in `<state_root>/<package>`.
    pub state_root: PathBuf,
    /// Files copied into every build context.
    pub template_dir: PathBuf,
    /// Container runtime binary.
    pub runtime: String,
    pub ping_timeout: Duration,
}

impl SwitchConfig {
    pub fn new(state_root: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
            template_dir: template_dir.into(),
            runtime: DEFAULT_RUNTIME.to_string(),
            ping_timeout: DEFAULT_PING_TIMEOUT,
        }
    }
}
