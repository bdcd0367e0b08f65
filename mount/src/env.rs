use crate::error::MountError;
use std::path::{Path, PathBuf};

const FALLBACK_SHELL: &str = "sh";

/// The parts of the invoking user's identity that come from the environment
/// rather than from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEnv {
    pub username: String,
    pub home: PathBuf,
    pub shell: String,
    pub cwd: PathBuf,
}

impl UserEnv {
    /// Reads `USER`, `HOME`, `SHELL` and the working directory.
    pub fn from_env() -> Result<Self, MountError> {
        let username = match std::env::var("USER") {
            Ok(user) if !user.is_empty() => user,
            _ => username_from_passwd().ok_or(MountError::MissingEnv("USER"))?,
        };

        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(MountError::MissingEnv("HOME"))?;

        let shell = match std::env::var("SHELL") {
            Ok(shell) if !shell.is_empty() => shell_name(&shell),
            _ => {
                tracing::warn!("SHELL is not set, falling back to {}", FALLBACK_SHELL);
                FALLBACK_SHELL.to_string()
            }
        };

        let cwd = std::env::current_dir()?;

        Ok(Self {
            username,
            home,
            shell,
            cwd,
        })
    }
}

/// `/usr/local/bin/fish` -> `fish`
pub fn shell_name(shell: &str) -> String {
    Path::new(shell)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| shell.to_string())
}

fn username_from_passwd() -> Option<String> {
    let uid = nix::unistd::getuid();
    nix::unistd::User::from_uid(uid)
        .ok()
        .flatten()
        .map(|user| user.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_name() {
        assert_eq!(shell_name("/bin/bash"), "bash");
        assert_eq!(shell_name("/usr/local/bin/fish"), "fish");
        assert_eq!(shell_name("zsh"), "zsh");
    }
}
