use crate::error::PackageError;
use std::fmt;
use std::path::Path;

const IMAGE_PREFIX: &str = "oswitch_";

/// A package identifier as typed by the user, e.g. `samtools` or
/// `yeban/biolinux:8`.
///
/// The identifier doubles as the base image of the generated build recipe and
/// as the relative path of its build context, so it is validated up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId(String);

impl PackageId {
    pub fn parse(package: &str) -> Result<Self, PackageError> {
        let package = package.trim();

        if package.is_empty() {
            return Err(PackageError::Empty);
        }

        if package.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PackageError::Invalid(
                package.to_string(),
                "contains whitespace",
            ));
        }

        if package.starts_with('/') {
            return Err(PackageError::Invalid(
                package.to_string(),
                "must not be an absolute path",
            ));
        }

        if package
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..")
        {
            return Err(PackageError::Invalid(
                package.to_string(),
                "contains an empty or relative path component",
            ));
        }

        Ok(Self(package.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative path of this package's build context below the state root.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// The identifier with `/` and `:` replaced by `_`, which the runtime
    /// accepts in both image and container names.
    ///
    /// Not injective: `a/b`, `a:b` and `a_b` all sanitize to `a_b` and so
    /// share one image.
    pub fn sanitized(&self) -> String {
        self.0.replace(['/', ':'], "_")
    }

    pub fn image_name(&self) -> String {
        format!("{}{}", IMAGE_PREFIX, self.sanitized())
    }

    pub fn container_name(&self, pid: u32) -> String {
        format!("{}-{}", self.sanitized(), pid)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
