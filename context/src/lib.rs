mod error;
mod manager;
mod manifest;

pub use error::ContextError;
pub use manager::BuildContextManager;
pub use manifest::{Manifest, MANIFEST_FILE, SETUP_SCRIPT, SUDOERS_FRAGMENT};
