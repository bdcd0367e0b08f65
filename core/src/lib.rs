mod error;
mod identity;
mod invocation;
mod package;
mod runtime;

pub use error::{PackageError, RuntimeError};
pub use identity::UserIdentity;
pub use invocation::{shell_quote, ContainerInvocation};
pub use package::PackageId;
pub use runtime::{DockerCli, Runtime, DEFAULT_RUNTIME};
