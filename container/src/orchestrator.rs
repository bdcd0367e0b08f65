use crate::banner::welcome_banner;
use crate::config::SwitchConfig;
use crate::error::SwitchError;
use oswitch_context::{BuildContextManager, ContextError};
use oswitch_core::{shell_quote, ContainerInvocation, DockerCli, PackageId, Runtime, UserIdentity};
use oswitch_image::ImageRegistry;
use oswitch_mount::{platform_resolver, HostContext, PlatformMountResolver};
use std::io::IsTerminal;
use std::sync::Arc;

/// Drives one switch: ping the daemon, build the image if it is missing,
/// then hand the terminal to the container.
///
/// Every step runs to completion before the next starts, so build and run
/// never overlap for an image.
pub struct SwitchOrchestrator {
    config: SwitchConfig,
    runtime: Arc<dyn Runtime>,
    resolver: Box<dyn PlatformMountResolver>,
    images: ImageRegistry,
    contexts: BuildContextManager,
    tty: bool,
    pid: u32,
}

impl SwitchOrchestrator {
    pub fn new(
        config: SwitchConfig,
        runtime: Arc<dyn Runtime>,
        resolver: Box<dyn PlatformMountResolver>,
    ) -> Self {
        let images = ImageRegistry::new(runtime.clone());
        let contexts = BuildContextManager::new(&config.state_root, &config.template_dir);

        Self {
            config,
            runtime,
            resolver,
            images,
            contexts,
            tty: std::io::stdin().is_terminal(),
            pid: std::process::id(),
        }
    }

    /// Uses the docker CLI named in `config` and the resolver for this
    /// platform.
    pub fn from_config(config: SwitchConfig) -> Result<Self, SwitchError> {
        let runtime = Arc::new(DockerCli::new(config.runtime.clone()));
        let resolver = platform_resolver()?;
        Ok(Self::new(config, runtime, resolver))
    }

    pub fn with_tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }

    /// Overrides the process id used in container names.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Switches into `package`, running `command` or an interactive shell.
    ///
    /// With the docker CLI on Unix this does not return on success: the
    /// process becomes the container. Otherwise the container's exit code is
    /// returned.
    pub async fn run(&self, package: &str, command: Option<&str>) -> Result<i32, SwitchError> {
        let package = PackageId::parse(package).map_err(|e| {
            tracing::debug!(error = %e, "Rejected package identifier");
            SwitchError::PackageNotFound(package.trim().to_string())
        })?;
        let image = package.image_name();

        self.ping().await?;

        let host = self.resolver.resolve()?;

        self.build(&package, &image, &host.identity).await?;

        let invocation = self.invocation(&package, &image, &host, command);
        tracing::info!(
            container = %invocation.name,
            image = %invocation.image,
            mounts = invocation.mounts.len(),
            "Switching into container"
        );
        Ok(self.runtime.run(&invocation).await?)
    }

    async fn ping(&self) -> Result<(), SwitchError> {
        let unavailable = || SwitchError::DaemonUnavailable(self.config.runtime.clone());

        match tokio::time::timeout(self.config.ping_timeout, self.runtime.info()).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => {
                tracing::debug!("Daemon info returned failure");
                Err(unavailable())
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Daemon info could not run");
                Err(unavailable())
            }
            Err(_) => {
                tracing::debug!(timeout = ?self.config.ping_timeout, "Daemon info timed out");
                Err(unavailable())
            }
        }
    }

    async fn build(
        &self,
        package: &PackageId,
        image: &str,
        identity: &UserIdentity,
    ) -> Result<(), SwitchError> {
        if self.images.exists(image).await? {
            tracing::debug!(image = %image, "Image exists, skipping build");
            return Ok(());
        }

        let context = match self.contexts.ensure(package, identity).await {
            Ok(context) => context,
            Err(ContextError::TemplatesNotFound(dir)) => {
                tracing::warn!(templates = ?dir, "No build templates available");
                return Err(SwitchError::PackageNotFound(package.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if !self.runtime.build(image, &context).await? {
            return Err(SwitchError::BuildFailed(image.to_string()));
        }

        tracing::info!(image = %image, "Image built");
        Ok(())
    }

    fn invocation(
        &self,
        package: &PackageId,
        image: &str,
        host: &HostContext,
        command: Option<&str>,
    ) -> ContainerInvocation {
        let identity = &host.identity;
        let name = package.container_name(self.pid);

        let command = match command.map(str::trim).filter(|c| !c.is_empty()) {
            Some(command) => command.to_string(),
            None => {
                let banner = welcome_banner(package, &name, &host.mountpoints);
                format!("echo {}; {} -i", shell_quote(&banner), identity.shell)
            }
        };

        ContainerInvocation {
            image: image.to_string(),
            name,
            workdir: identity.cwd.clone(),
            user: identity.username.clone(),
            mounts: host
                .mountpoints
                .iter()
                .map(|m| m.path().to_path_buf())
                .collect(),
            tty: self.tty,
            command,
        }
    }
}
