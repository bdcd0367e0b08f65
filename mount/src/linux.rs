use crate::env::UserEnv;
use crate::error::MountError;
use crate::paths::{is_readable, root_entries, sanitize};
use crate::{MountPoint, PlatformMountResolver};
use oswitch_core::UserIdentity;
use std::path::{Component, Path, PathBuf};

const MOUNT_TABLE: &str = "/proc/mounts";

/// Top-level directories that are never mounted, together with everything
/// below them.
const BLACKLIST: &[&str] = &[
    "bin",
    "boot",
    "dev",
    "etc",
    "lib",
    "lib32",
    "lib64",
    "libx32",
    "lost+found",
    "proc",
    "sbin",
    "sys",
    "tmp",
    "usr",
    "var",
];

/// Resolves identity from the process and mounts from the kernel's mount
/// table.
#[derive(Debug, Clone)]
pub struct LinuxResolver {
    env: UserEnv,
    mount_table: PathBuf,
}

impl LinuxResolver {
    pub fn new(env: UserEnv) -> Self {
        Self::with_mount_table(env, MOUNT_TABLE)
    }

    pub fn with_mount_table(env: UserEnv, mount_table: impl Into<PathBuf>) -> Self {
        Self {
            env,
            mount_table: mount_table.into(),
        }
    }

    fn read_mount_table(&self) -> Result<Vec<PathBuf>, MountError> {
        let table =
            std::fs::read_to_string(&self.mount_table).map_err(|e| MountError::MountTable {
                path: self.mount_table.display().to_string(),
                source: e,
            })?;
        Ok(parse_mount_table(&table))
    }
}

impl PlatformMountResolver for LinuxResolver {
    fn identity(&self) -> Result<UserIdentity, MountError> {
        Ok(UserIdentity {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
            username: self.env.username.clone(),
            home: self.env.home.clone(),
            shell: self.env.shell.clone(),
            cwd: self.env.cwd.clone(),
        })
    }

    fn mountpoints(&self, home: &Path) -> Result<Vec<MountPoint>, MountError> {
        let mut candidates = self.read_mount_table()?;
        candidates.extend(root_entries()?);
        Ok(filter_mountpoints(candidates, home, is_readable))
    }
}

/// Mount targets from `/proc/mounts` style content, unescaped.
pub fn parse_mount_table(table: &str) -> Vec<PathBuf> {
    table
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|target| PathBuf::from(unescape(target)))
        .collect()
}

/// Decodes the octal escapes the kernel uses for whitespace and backslashes
/// in mount paths.
pub fn unescape(path: &str) -> String {
    path.replace("\\040", " ")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
        .replace("\\011", "\t")
}

/// Applies the Linux blacklist and readability check to `candidates`.
pub fn filter_mountpoints<I, R>(candidates: I, home: &Path, is_readable: R) -> Vec<MountPoint>
where
    I: IntoIterator<Item = PathBuf>,
    R: Fn(&Path) -> bool,
{
    sanitize(candidates, home, is_blacklisted, is_readable)
}

fn is_blacklisted(path: &Path) -> bool {
    let mut components = path.components();
    if components.next() != Some(Component::RootDir) {
        return true;
    }

    let first = match components.next() {
        Some(Component::Normal(first)) => first,
        // "/" itself
        _ => return true,
    };

    // /run is runtime state, except removable media under /run/media.
    if first == "run" {
        return !matches!(components.next(), Some(Component::Normal(second)) if second == "media");
    }

    BLACKLIST.iter().any(|entry| first == *entry)
}
