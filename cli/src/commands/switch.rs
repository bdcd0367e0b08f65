use oswitch_container::{SwitchConfig, SwitchError, SwitchOrchestrator};

/// Switches into `package`. Words of `command` are joined with spaces; no
/// words means an interactive shell.
pub async fn switch(
    config: SwitchConfig,
    package: &str,
    command: &[String],
) -> Result<i32, SwitchError> {
    let orchestrator = SwitchOrchestrator::from_config(config)?;

    let command = command.join(" ");
    let command = Some(command.as_str()).filter(|c| !c.trim().is_empty());

    orchestrator.run(package, command).await
}
