use std::path::PathBuf;

/// Who the container should act as.
///
/// `uid` and `gid` are the ids that end up owning files written through the
/// bind mounts. When the runtime lives in a helper VM these are the VM user's
/// ids, not the host's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: u32,
    pub gid: u32,
    pub username: String,
    pub home: PathBuf,
    /// Basename of the login shell, e.g. `bash`.
    pub shell: String,
    pub cwd: PathBuf,
}

impl UserIdentity {
    /// Positional arguments for the user-setup script baked into the image.
    pub fn setup_args(&self) -> [String; 5] {
        [
            self.uid.to_string(),
            self.gid.to_string(),
            self.username.clone(),
            self.home.display().to_string(),
            self.shell.clone(),
        ]
    }
}
