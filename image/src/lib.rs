mod error;
mod registry;
mod types;

pub use error::ImageError;
pub use registry::ImageRegistry;
pub use types::*;
