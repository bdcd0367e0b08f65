use crate::error::ImageError;
use crate::types::{parse_image_listing, split_image_name, Image};
use oswitch_core::Runtime;
use std::sync::Arc;

/// Answers questions about the images the runtime already has.
///
/// Nothing is cached: every call lists images afresh.
#[derive(Clone)]
pub struct ImageRegistry {
    runtime: Arc<dyn Runtime>,
}

impl ImageRegistry {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    pub async fn list(&self) -> Result<Vec<Image>, ImageError> {
        let listing = self.runtime.images().await?;
        let images = parse_image_listing(&listing);
        tracing::debug!(count = images.len(), "Listed images");
        Ok(images)
    }

    /// Looks up `name` as `repository[:tag]`, the tag defaulting to `latest`.
    pub async fn get(&self, name: &str) -> Result<Option<Image>, ImageError> {
        let Some((repository, tag)) = split_image_name(name) else {
            return Ok(None);
        };

        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|image| image.repository == repository && image.tag == tag))
    }

    pub async fn exists(&self, name: &str) -> Result<bool, ImageError> {
        Ok(self.get(name).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oswitch_core::{ContainerInvocation, RuntimeError};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LISTING: &str = "\
REPOSITORY          TAG                 IMAGE ID            CREATED             SIZE
oswitch_samtools    latest              1a2b3c4d5e6f        2 weeks ago         412MB
repo                tagX                0f9e8d7c6b5a        3 months ago        2.1GB
";

    struct ListingRuntime {
        listing: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Runtime for ListingRuntime {
        async fn info(&self) -> Result<bool, RuntimeError> {
            Ok(true)
        }

        async fn images(&self) -> Result<String, RuntimeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listing.to_string())
        }

        async fn build(&self, _tag: &str, _context: &Path) -> Result<bool, RuntimeError> {
            unreachable!("registry never builds")
        }

        async fn run(&self, _invocation: &ContainerInvocation) -> Result<i32, RuntimeError> {
            unreachable!("registry never runs containers")
        }
    }

    fn registry() -> (ImageRegistry, Arc<ListingRuntime>) {
        let runtime = Arc::new(ListingRuntime {
            listing: LISTING,
            calls: AtomicUsize::new(0),
        });
        (ImageRegistry::new(runtime.clone()), runtime)
    }

    #[tokio::test]
    async fn test_list() {
        let (registry, _) = registry();
        let images = registry.list().await.unwrap();
        assert_eq!(images.len(), 2);
    }

    #[tokio::test]
    async fn test_get_defaults_to_latest() {
        let (registry, _) = registry();

        let image = registry.get("oswitch_samtools").await.unwrap().unwrap();
        assert_eq!(image.id, "1a2b3c4d5e6f");

        assert!(registry.get("repo").await.unwrap().is_none());
        assert!(registry.get("repo:tagX").await.unwrap().is_some());
        assert!(registry.get("repo:tagY").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_without_repository_skips_runtime() {
        let (registry, runtime) = registry();

        assert!(registry.get(":tagX").await.unwrap().is_none());
        assert!(registry.get("").await.unwrap().is_none());
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exists_queries_every_time() {
        let (registry, runtime) = registry();

        assert!(registry.exists("oswitch_samtools:latest").await.unwrap());
        assert!(!registry.exists("oswitch_bwa").await.unwrap());
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 2);
    }
}
