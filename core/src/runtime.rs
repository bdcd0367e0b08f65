use crate::error::RuntimeError;
use crate::invocation::ContainerInvocation;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_RUNTIME: &str = "docker";

/// The container engine oswitch shells out to.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Returns whether the daemon answered. Callers bound this with a timeout.
    async fn info(&self) -> Result<bool, RuntimeError>;

    /// Raw output of the image listing, header line included.
    async fn images(&self) -> Result<String, RuntimeError>;

    /// Builds `context` tagged `tag`. Returns whether the build succeeded.
    async fn build(&self, tag: &str, context: &Path) -> Result<bool, RuntimeError>;

    /// Hands the terminal over to the container.
    ///
    /// Implementations may replace the current process, in which case this
    /// only returns on failure. Otherwise it returns the container's exit code.
    async fn run(&self, invocation: &ContainerInvocation) -> Result<i32, RuntimeError>;
}

/// [`Runtime`] backed by the docker command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> RuntimeError {
        RuntimeError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME)
    }
}

#[async_trait]
impl Runtime for DockerCli {
    async fn info(&self) -> Result<bool, RuntimeError> {
        let status = self
            .command()
            .arg("info")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        tracing::debug!(program = %self.program, status = ?status, "Daemon info");
        Ok(status.success())
    }

    async fn images(&self) -> Result<String, RuntimeError> {
        let output = self
            .command()
            .arg("images")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                program: self.program.clone(),
                command: "images".to_string(),
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn build(&self, tag: &str, context: &Path) -> Result<bool, RuntimeError> {
        tracing::info!(program = %self.program, tag = %tag, context = ?context, "Building image");

        let status = self
            .command()
            .arg("build")
            .arg("-t")
            .arg(tag)
            .arg(context)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            tracing::error!(tag = %tag, status = ?status, "Image build failed");
        }

        Ok(status.success())
    }

    #[cfg(unix)]
    async fn run(&self, invocation: &ContainerInvocation) -> Result<i32, RuntimeError> {
        use std::os::unix::process::CommandExt;

        tracing::info!(
            program = %self.program,
            container = %invocation.name,
            image = %invocation.image,
            "Replacing process with container"
        );

        // exec only returns if the process image could not be replaced.
        let err = std::process::Command::new(&self.program)
            .args(invocation.args())
            .exec();
        Err(self.spawn_error(err))
    }

    #[cfg(not(unix))]
    async fn run(&self, invocation: &ContainerInvocation) -> Result<i32, RuntimeError> {
        tracing::info!(
            program = %self.program,
            container = %invocation.name,
            image = %invocation.image,
            "Starting container"
        );

        let status = Command::new(&self.program)
            .args(invocation.args())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        status.code().ok_or_else(|| RuntimeError::Terminated {
            program: self.program.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cli = DockerCli::new("oswitch-test-no-such-runtime");

        let result = cli.info().await;
        assert!(matches!(result, Err(RuntimeError::Spawn { .. })));

        let result = cli.images().await;
        assert!(matches!(result, Err(RuntimeError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_info_reports_exit_status() {
        assert!(DockerCli::new("true").info().await.unwrap());
        assert!(!DockerCli::new("false").info().await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_images_failure() {
        let result = DockerCli::new("false").images().await;
        assert!(matches!(result, Err(RuntimeError::CommandFailed { .. })));
    }

    #[test]
    fn test_default_program() {
        assert_eq!(DockerCli::default().program(), "docker");
    }
}
