use std::error::Error;
use std::path::PathBuf;

const STATE_DIR: &str = ".oswitch";
const ISSUE_TRACKER: &str = "https://github.com/wurmlab/oswitch/issues";

/// `~/.oswitch`
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_DIR))
}

/// `<prefix>/share/oswitch/context`, where `<prefix>` is the parent of the
/// directory holding the binary.
pub fn default_template_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let prefix = exe.parent()?.parent()?;
    Some(prefix.join("share").join("oswitch").join("context"))
}

/// The error and each of its sources, one per line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("  caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

pub fn bug_report(err: &(dyn Error + 'static)) -> String {
    format!(
        "\nOuch! Looks like you have hit a bug. Please could you report the below to our\n\
         issue tracker ({}):\n\n{}\n{:?}\n",
        ISSUE_TRACKER,
        error_chain(err),
        err
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("build context error")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain() {
        let err = Outer(std::io::Error::other("disk full"));
        assert_eq!(
            error_chain(&err),
            "build context error\n  caused by: disk full"
        );
    }

    #[test]
    fn test_bug_report_mentions_tracker() {
        let err = Outer(std::io::Error::other("disk full"));
        let report = bug_report(&err);
        assert!(report.contains(ISSUE_TRACKER));
        assert!(report.contains("caused by: disk full"));
    }

    #[test]
    fn test_default_state_dir() {
        if let Some(dir) = default_state_dir() {
            assert!(dir.ends_with(".oswitch"));
        }
    }
}
