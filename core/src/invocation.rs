use std::ffi::OsString;
use std::path::PathBuf;

/// Everything needed for `<runtime> run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInvocation {
    pub image: String,
    /// Used as both container name and hostname.
    pub name: String,
    pub workdir: PathBuf,
    pub user: String,
    pub mounts: Vec<PathBuf>,
    /// Allocate a pseudo-TTY. Only sensible when stdin is a terminal.
    pub tty: bool,
    /// Passed to the image's `<shell> -c` entrypoint as a single argument.
    pub command: String,
}

impl ContainerInvocation {
    /// Arguments following the runtime binary.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "run".into(),
            "--name".into(),
            self.name.clone().into(),
            "--hostname".into(),
            self.name.clone().into(),
        ];

        args.push(if self.tty { "-it" } else { "-i" }.into());
        args.push("--rm".into());
        args.push("-w".into());
        args.push(self.workdir.clone().into());
        args.push("--user".into());
        args.push(self.user.clone().into());

        for mount in &self.mounts {
            let mut volume = OsString::from(mount.as_os_str());
            volume.push(":");
            volume.push(mount.as_os_str());
            args.push("-v".into());
            args.push(volume);
        }

        args.push(self.image.clone().into());
        args.push(self.command.clone().into());
        args
    }
}

/// Quotes `s` for a POSIX shell using single quotes.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
