use oswitch_core::PackageId;
use oswitch_mount::MountPoint;

const RULE: &str =
    "################################################################################";

/// Shown once when an interactive shell starts in the container.
pub fn welcome_banner(package: &PackageId, container: &str, mounts: &[MountPoint]) -> String {
    let mounts = mounts
        .iter()
        .map(|m| format!(" - {}", m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{RULE}
You are now running: {package}, in container: {container}.

Container is distinct from the shell you launched this container from. Changes
you make here will be lost unless it's made to one of the directories below:

{mounts}

It's possible you may not be able to write to one or more directories above,
but it should be possible to read data from all. Home directory is often the
safest to write to.

Press Ctrl-D or type 'exit' to go back.
{RULE}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_mounts() {
        let package = PackageId::parse("samtools").unwrap();
        let mounts = vec![
            MountPoint::new("/run/media/usb"),
            MountPoint::new("/home/alice"),
        ];

        let banner = welcome_banner(&package, "samtools-42", &mounts);

        assert!(banner.starts_with(RULE));
        assert!(banner.contains("You are now running: samtools, in container: samtools-42."));
        assert!(banner.contains(" - /run/media/usb\n - /home/alice\n"));
        assert!(banner.ends_with(RULE));
    }
}
