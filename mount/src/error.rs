use thiserror::Error;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("could not read {path}: {source}")]
    MountTable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("identity lookup failed: {0}")]
    Identity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
