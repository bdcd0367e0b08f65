use oswitch_container::SwitchConfig;
use oswitch_context::{BuildContextManager, ContextError};

pub async fn list_packages(config: &SwitchConfig) -> Result<(), ContextError> {
    let contexts = BuildContextManager::new(&config.state_root, &config.template_dir);

    for package in contexts.packages().await? {
        println!("{}", package);
    }

    Ok(())
}
