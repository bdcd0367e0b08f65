use oswitch_core::{PackageId, UserIdentity};
use std::fmt;

pub const MANIFEST_FILE: &str = "Dockerfile";

/// Creates the container user from the positional identity arguments.
pub const SETUP_SCRIPT: &str = "_switch";

/// Grants the wheel group password-less sudo.
pub const SUDOERS_FRAGMENT: &str = "wheel";

const LOCALE: &str = "en_US.UTF-8";

/// The build recipe layered on top of a package's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    base: String,
    identity: UserIdentity,
}

impl Manifest {
    pub fn new(package: &PackageId, identity: &UserIdentity) -> Self {
        Self {
            base: package.as_str().to_string(),
            identity: identity.clone(),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell = &self.identity.shell;

        writeln!(f, "FROM {}", self.base)?;
        writeln!(f, "COPY {} /", SETUP_SCRIPT)?;
        writeln!(f, "COPY {} /etc/sudoers.d/", SUDOERS_FRAGMENT)?;
        writeln!(
            f,
            "RUN /{} {} 2>&1",
            SETUP_SCRIPT,
            self.identity.setup_args().join(" ")
        )?;
        writeln!(f, "ENV LC_ALL {}", LOCALE)?;
        writeln!(f, "USER {}", self.identity.username)?;
        writeln!(f, "ENTRYPOINT [\"{}\", \"-c\"]", shell)
    }
}
