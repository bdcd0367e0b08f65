//! Host mount point discovery and identity resolution.
//!
//! Which host paths get bind-mounted into a container, and as whom the
//! container runs, depends on the host platform. [`platform_resolver`] picks
//! the right [`PlatformMountResolver`] once at startup.

mod darwin;
mod env;
mod error;
mod linux;
mod paths;

pub use darwin::{filter_mountpoints as filter_darwin_mountpoints, DarwinResolver};
pub use env::{shell_name, UserEnv};
pub use error::MountError;
pub use linux::{
    filter_mountpoints as filter_linux_mountpoints, parse_mount_table, unescape, LinuxResolver,
};

use oswitch_core::UserIdentity;
use std::fmt;
use std::path::{Path, PathBuf};

/// A host path that is bind-mounted at the same location in the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPoint(PathBuf);

impl MountPoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Identity plus the ordered set of mount points for one invocation.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub identity: UserIdentity,
    pub mountpoints: Vec<MountPoint>,
}

pub trait PlatformMountResolver: Send + Sync {
    fn identity(&self) -> Result<UserIdentity, MountError>;

    /// Mount points eligible for bind-mounting. `home` is always the last
    /// entry.
    fn mountpoints(&self, home: &Path) -> Result<Vec<MountPoint>, MountError>;

    fn resolve(&self) -> Result<HostContext, MountError> {
        let identity = self.identity()?;
        let mountpoints = self.mountpoints(&identity.home)?;

        tracing::debug!(
            uid = identity.uid,
            gid = identity.gid,
            user = %identity.username,
            mounts = mountpoints.len(),
            "Resolved host context"
        );

        Ok(HostContext {
            identity,
            mountpoints,
        })
    }
}

/// Fails every call; stands in on platforms oswitch does not know.
#[derive(Debug, Clone)]
pub struct UnsupportedPlatformResolver {
    os: String,
}

impl UnsupportedPlatformResolver {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl PlatformMountResolver for UnsupportedPlatformResolver {
    fn identity(&self) -> Result<UserIdentity, MountError> {
        Err(MountError::UnsupportedPlatform(self.os.clone()))
    }

    fn mountpoints(&self, _home: &Path) -> Result<Vec<MountPoint>, MountError> {
        Err(MountError::UnsupportedPlatform(self.os.clone()))
    }
}

/// Picks the resolver for the platform this binary runs on.
pub fn platform_resolver() -> Result<Box<dyn PlatformMountResolver>, MountError> {
    resolver_for(std::env::consts::OS)
}

fn resolver_for(os: &str) -> Result<Box<dyn PlatformMountResolver>, MountError> {
    let resolver: Box<dyn PlatformMountResolver> = match os {
        "linux" => Box::new(LinuxResolver::new(UserEnv::from_env()?)),
        "macos" => Box::new(DarwinResolver::new(UserEnv::from_env()?)),
        other => {
            tracing::warn!(os = %other, "No mount resolver for this platform");
            Box::new(UnsupportedPlatformResolver::new(other))
        }
    };
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_fails_fast() {
        let resolver = resolver_for("plan9").unwrap();

        assert!(matches!(
            resolver.resolve(),
            Err(MountError::UnsupportedPlatform(os)) if os == "plan9"
        ));
        assert!(matches!(
            resolver.mountpoints(Path::new("/home/glenda")),
            Err(MountError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_mount_point_display() {
        let mount = MountPoint::new("/run/media/usb");
        assert_eq!(mount.to_string(), "/run/media/usb");
        assert_eq!(mount.path(), Path::new("/run/media/usb"));
    }
}
