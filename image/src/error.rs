use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image listing failed: {0}")]
    Runtime(#[from] oswitch_core::RuntimeError),
}
