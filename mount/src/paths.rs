use crate::MountPoint;
use nix::unistd::{access, AccessFlags};
use std::path::{Path, PathBuf};

pub(crate) fn is_readable(path: &Path) -> bool {
    access(path, AccessFlags::R_OK).is_ok()
}

/// Directories directly below `/`.
pub(crate) fn root_entries() -> std::io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir("/")? {
        let entry = entry?;
        if entry.path().is_dir() {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}

/// Deduplicates `candidates` in first-seen order, drops blacklisted and
/// unreadable paths, then appends `home` unconditionally.
pub(crate) fn sanitize<I, B, R>(
    candidates: I,
    home: &Path,
    is_blacklisted: B,
    is_readable: R,
) -> Vec<MountPoint>
where
    I: IntoIterator<Item = PathBuf>,
    B: Fn(&Path) -> bool,
    R: Fn(&Path) -> bool,
{
    let mut kept: Vec<PathBuf> = Vec::new();

    for path in candidates {
        if kept.contains(&path) || path == home {
            continue;
        }
        if is_blacklisted(&path) {
            tracing::trace!(path = ?path, "Skipping blacklisted mount point");
            continue;
        }
        if !is_readable(&path) {
            tracing::debug!(path = ?path, "Skipping unreadable mount point");
            continue;
        }
        kept.push(path);
    }

    kept.push(home.to_path_buf());
    kept.into_iter().map(MountPoint::new).collect()
}
