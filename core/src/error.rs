use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {command} failed with status: {status}")]
    CommandFailed {
        program: String,
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("{program} was terminated by a signal")]
    Terminated { program: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackageError {
    #[error("package identifier is empty")]
    Empty,

    #[error("invalid package identifier {0:?}: {1}")]
    Invalid(String, &'static str),
}
