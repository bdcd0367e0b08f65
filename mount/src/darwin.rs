use crate::env::UserEnv;
use crate::error::MountError;
use crate::paths::{is_readable, root_entries, sanitize};
use crate::{MountPoint, PlatformMountResolver};
use oswitch_core::UserIdentity;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

const VOLUMES: &str = "/Volumes";
const DEFAULT_MACHINE: &str = "default";

/// Compared case-insensitively against the first path component.
const BLACKLIST: &[&str] = &[
    "bin",
    "cores",
    "dev",
    "etc",
    "home",
    "incompatible software",
    "installer.failurerequests",
    "lost+found",
    "net",
    "network",
    "opt",
    "private",
    "sbin",
    "system",
    "users",
    "tmp",
    "usr",
    "var",
];

/// Where the docker daemon runs on macOS, and so where uid/gid come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HelperVm {
    DockerMachine(String),
    Boot2Docker,
    /// The daemon shares the host's users.
    None,
}

impl HelperVm {
    /// `docker-machine` wins over `boot2docker`. Without either the runtime
    /// is native.
    fn detect<F>(command_exists: F, machine: Option<String>) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if command_exists("docker-machine") {
            let machine = machine
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MACHINE.to_string());
            return HelperVm::DockerMachine(machine);
        }
        if command_exists("boot2docker") {
            tracing::warn!(
                "'boot2docker' has been deprecated in favour of 'docker-machine', \
                 please upgrade via the Docker Toolbox"
            );
            return HelperVm::Boot2Docker;
        }
        HelperVm::None
    }

    fn command(&self) -> Option<Command> {
        match self {
            HelperVm::DockerMachine(machine) => {
                let mut cmd = Command::new("docker-machine");
                cmd.arg("ssh").arg(machine);
                Some(cmd)
            }
            HelperVm::Boot2Docker => {
                let mut cmd = Command::new("boot2docker");
                cmd.arg("ssh");
                Some(cmd)
            }
            HelperVm::None => None,
        }
    }
}

/// Resolves mounts from `/Volumes` and identity from the VM hosting the
/// docker daemon, or from the process when there is no VM.
#[derive(Debug, Clone)]
pub struct DarwinResolver {
    env: UserEnv,
    vm: HelperVm,
    volumes_dir: PathBuf,
}

impl DarwinResolver {
    pub fn new(env: UserEnv) -> Self {
        Self::with_volumes_dir(env, VOLUMES)
    }

    pub fn with_volumes_dir(env: UserEnv, volumes_dir: impl Into<PathBuf>) -> Self {
        let machine = std::env::var("DOCKER_MACHINE_NAME").ok();
        Self {
            env,
            vm: HelperVm::detect(command_exists, machine),
            volumes_dir: volumes_dir.into(),
        }
    }

    fn ids(&self) -> Result<(u32, u32), MountError> {
        if self.vm == HelperVm::None {
            return Ok((
                nix::unistd::getuid().as_raw(),
                nix::unistd::getgid().as_raw(),
            ));
        }
        Ok((self.remote_id("-u")?, self.remote_id("-g")?))
    }

    fn remote_id(&self, flag: &str) -> Result<u32, MountError> {
        let Some(mut cmd) = self.vm.command() else {
            return Err(MountError::Identity("no helper VM to query".to_string()));
        };
        cmd.arg("id").arg(flag);

        tracing::debug!(vm = ?self.vm, flag = %flag, "Querying helper VM identity");

        let output = cmd
            .output()
            .map_err(|e| MountError::Identity(format!("failed to query helper VM: {}", e)))?;

        if !output.status.success() {
            return Err(MountError::Identity(format!(
                "`id {}` in helper VM failed with status: {}",
                flag, output.status
            )));
        }

        parse_id(&String::from_utf8_lossy(&output.stdout))
    }
}

impl PlatformMountResolver for DarwinResolver {
    fn identity(&self) -> Result<UserIdentity, MountError> {
        let (uid, gid) = self.ids()?;
        Ok(UserIdentity {
            uid,
            gid,
            username: self.env.username.clone(),
            home: self.env.home.clone(),
            shell: self.env.shell.clone(),
            cwd: self.env.cwd.clone(),
        })
    }

    fn mountpoints(&self, home: &Path) -> Result<Vec<MountPoint>, MountError> {
        let mut candidates = volumes(&self.volumes_dir)?;
        candidates.extend(root_entries()?);
        Ok(filter_mountpoints(candidates, home, is_readable))
    }
}

/// Entries of `dir`, with symlinks replaced by their targets.
fn volumes(dir: &Path) -> Result<Vec<PathBuf>, MountError> {
    let mut volumes = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(volumes),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let path = entry?.path();
        if path.is_symlink() {
            let target = std::fs::read_link(&path)?;
            volumes.push(link_target(dir, &target));
        } else {
            volumes.push(path);
        }
    }
    volumes.sort();
    Ok(volumes)
}

/// Absolute targets are taken as is. Relative ones are resolved against
/// `dir` without touching the filesystem.
fn link_target(dir: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }

    let mut resolved = dir.to_path_buf();
    for component in target.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    resolved
}

/// Applies the macOS blacklist and readability check to `candidates`.
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
        Some(Component::Normal(first)) => first.to_string_lossy().to_lowercase(),
        _ => return true,
    };

    // /Volumes itself, but not the volumes below it.
    if first == "volumes" {
        return components.next().is_none();
    }

    BLACKLIST.contains(&first.as_str())
}

fn parse_id(output: &str) -> Result<u32, MountError> {
    output
        .trim()
        .parse()
        .map_err(|_| MountError::Identity(format!("unexpected `id` output: {:?}", output)))
}

fn command_exists(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
