use crate::error::ContextError;
use crate::manifest::{Manifest, MANIFEST_FILE};
use oswitch_core::{PackageId, UserIdentity};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Owns the per-package build contexts below a state root.
///
/// Each package gets `<state_root>/<package>` holding a copy of the template
/// files and a generated manifest. Contexts are left on disk after a build.
pub struct BuildContextManager {
    state_root: PathBuf,
    template_dir: PathBuf,
}

impl BuildContextManager {
    pub fn new(state_root: impl AsRef<Path>, template_dir: impl AsRef<Path>) -> Self {
        Self {
            state_root: state_root.as_ref().to_path_buf(),
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    pub fn context_dir(&self, package: &PackageId) -> PathBuf {
        self.state_root.join(package.as_path())
    }

    /// Writes a complete build context for `package` and returns its path.
    ///
    /// Templates and manifest are rewritten in full on every call.
    pub async fn ensure(
        &self,
        package: &PackageId,
        identity: &UserIdentity,
    ) -> Result<PathBuf, ContextError> {
        let templates = self.template_files().await?;
        let context_dir = self.context_dir(package);

        tracing::info!(package = %package, context = ?context_dir, "Preparing build context");

        fs::create_dir_all(&context_dir)
            .await
            .map_err(|e| prepare_error(&context_dir, e))?;

        for template in templates {
            let Some(name) = template.file_name() else {
                continue;
            };
            copy_recursive(&template, &context_dir.join(name)).await?;
        }

        let manifest_path = context_dir.join(MANIFEST_FILE);
        let manifest = Manifest::new(package, identity).render();
        fs::write(&manifest_path, manifest)
            .await
            .map_err(|e| prepare_error(&manifest_path, e))?;

        tracing::debug!(manifest = ?manifest_path, "Wrote build manifest");
        Ok(context_dir)
    }

    /// Packages that already have a build context, sorted.
    ///
    /// A package is any directory below the state root holding a manifest,
    /// however deep (`samtools`, `yeban/biolinux:8`, `quay.io/org/tool`).
    /// One context may sit inside another (`a/b` and `a/b/c`).
    pub async fn packages(&self) -> Result<Vec<String>, ContextError> {
        let mut packages = Vec::new();
        let mut stack = list_dirs(&self.state_root).await?;

        while let Some(dir) = stack.pop() {
            if dir.join(MANIFEST_FILE).is_file() {
                packages.push(self.relative_name(&dir));
            }
            stack.extend(list_dirs(&dir).await?);
        }

        packages.sort();
        Ok(packages)
    }

    fn relative_name(&self, dir: &Path) -> String {
        dir.strip_prefix(&self.state_root)
            .unwrap_or(dir)
            .to_string_lossy()
            .into_owned()
    }

    async fn template_files(&self) -> Result<Vec<PathBuf>, ContextError> {
        let mut entries = match fs::read_dir(&self.template_dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContextError::TemplatesNotFound(self.template_dir.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            files.push(entry.path());
        }

        if files.is_empty() {
            return Err(ContextError::TemplatesNotFound(self.template_dir.clone()));
        }

        files.sort();
        Ok(files)
    }
}

fn prepare_error(path: &Path, source: std::io::Error) -> ContextError {
    ContextError::Prepare {
        path: path.to_path_buf(),
        source,
    }
}

/// Subdirectories of `dir`; empty if `dir` does not exist.
async fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>, ContextError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Copies a file or directory tree, overwriting what is already there.
async fn copy_recursive(src: &Path, dst: &Path) -> Result<(), ContextError> {
    let mut stack = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = stack.pop() {
        let metadata = fs::metadata(&from).await?;

        if metadata.is_dir() {
            fs::create_dir_all(&to)
                .await
                .map_err(|e| prepare_error(&to, e))?;
            let mut entries = fs::read_dir(&from).await?;
            while let Some(entry) = entries.next_entry().await? {
                stack.push((entry.path(), to.join(entry.file_name())));
            }
        } else {
            fs::copy(&from, &to)
                .await
                .map_err(|e| prepare_error(&to, e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity() -> UserIdentity {
        UserIdentity {
            uid: 1000,
            gid: 1000,
            username: "alice".to_string(),
            home: PathBuf::from("/home/alice"),
            shell: "bash".to_string(),
            cwd: PathBuf::from("/home/alice"),
        }
    }

    async fn templates() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_switch"), "#!/bin/sh\n").await.unwrap();
        fs::write(dir.path().join("wheel"), "%wheel ALL=(ALL) NOPASSWD: ALL\n")
            .await
            .unwrap();
        fs::create_dir_all(dir.path().join("extra")).await.unwrap();
        fs::write(dir.path().join("extra/motd"), "hello\n").await.unwrap();
        dir
    }

    #[tokio::test]
    async fn test_ensure_creates_context() {
        let state = TempDir::new().unwrap();
        let templates = templates().await;
        let manager = BuildContextManager::new(state.path(), templates.path());
        let package = PackageId::parse("samtools").unwrap();

        let context = manager.ensure(&package, &identity()).await.unwrap();

        assert_eq!(context, state.path().join("samtools"));
        assert!(context.join("_switch").is_file());
        assert!(context.join("wheel").is_file());
        assert!(context.join("extra/motd").is_file());

        let manifest = fs::read_to_string(context.join(MANIFEST_FILE)).await.unwrap();
        assert!(manifest.starts_with("FROM samtools\n"));
    }

    #[tokio::test]
    async fn test_ensure_is_deterministic() {
        let state = TempDir::new().unwrap();
        let templates = templates().await;
        let manager = BuildContextManager::new(state.path(), templates.path());
        let package = PackageId::parse("samtools").unwrap();

        let context = manager.ensure(&package, &identity()).await.unwrap();
        let first = fs::read(context.join(MANIFEST_FILE)).await.unwrap();

        // A stale manifest is replaced, not patched.
        fs::write(context.join(MANIFEST_FILE), "FROM stale\nextra junk\n")
            .await
            .unwrap();

        let context = manager.ensure(&package, &identity()).await.unwrap();
        let second = fs::read(context.join(MANIFEST_FILE)).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_templates() {
        let state = TempDir::new().unwrap();
        let manager = BuildContextManager::new(state.path(), state.path().join("nope"));
        let package = PackageId::parse("samtools").unwrap();

        let result = manager.ensure(&package, &identity()).await;
        assert!(matches!(result, Err(ContextError::TemplatesNotFound(_))));
        assert!(!manager.context_dir(&package).exists());
    }

    #[tokio::test]
    async fn test_empty_templates() {
        let state = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let manager = BuildContextManager::new(state.path(), empty.path());
        let package = PackageId::parse("samtools").unwrap();

        let result = manager.ensure(&package, &identity()).await;
        assert!(matches!(result, Err(ContextError::TemplatesNotFound(_))));
    }

    #[tokio::test]
    async fn test_packages() {
        let state = TempDir::new().unwrap();
        let templates = templates().await;
        let manager = BuildContextManager::new(state.path(), templates.path());

        assert!(manager.packages().await.unwrap().is_empty());

        for name in ["samtools", "yeban/biolinux:8", "bwa"] {
            let package = PackageId::parse(name).unwrap();
            manager.ensure(&package, &identity()).await.unwrap();
        }
        fs::create_dir_all(state.path().join("scratch")).await.unwrap();

        assert_eq!(
            manager.packages().await.unwrap(),
            vec!["bwa", "samtools", "yeban/biolinux:8"]
        );
    }

    #[tokio::test]
    async fn test_packages_at_any_depth() {
        let state = TempDir::new().unwrap();
        let templates = templates().await;
        let manager = BuildContextManager::new(state.path(), templates.path());

        for name in ["a/b/c", "quay.io/biocontainers/bwa:0.7", "a/b"] {
            let package = PackageId::parse(name).unwrap();
            manager.ensure(&package, &identity()).await.unwrap();
        }

        // Copied template directories such as `extra` are not packages.
        assert_eq!(
            manager.packages().await.unwrap(),
            vec!["a/b", "a/b/c", "quay.io/biocontainers/bwa:0.7"]
        );
    }

    #[tokio::test]
    async fn test_packages_without_state_root() {
        let state = TempDir::new().unwrap();
        let manager = BuildContextManager::new(state.path().join("missing"), state.path());
        assert!(manager.packages().await.unwrap().is_empty());
    }
}
