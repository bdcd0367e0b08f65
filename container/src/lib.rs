mod banner;
mod config;
mod error;
mod orchestrator;

pub use banner::welcome_banner;
pub use config::{SwitchConfig, DEFAULT_PING_TIMEOUT};
pub use error::SwitchError;
pub use orchestrator::SwitchOrchestrator;
