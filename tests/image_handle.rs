//! Registry-backed image handle composition and lifecycle

mod common;

use async_trait::async_trait;
use common::{MockExecutor, page};
use docker_image_inspector::{
    DockerTransport, Image, ImageBuilder, ImageSource, LayerInfo, RegistryError,
    RepositoryReference, Result,
};
use std::sync::{Arc, Mutex};

struct MockImage {
    digest: Option<String>,
}

#[async_trait]
impl Image for MockImage {
    async fn manifest(&self) -> Result<Vec<u8>> {
        Ok(br#"{"schemaVersion":2}"#.to_vec())
    }

    async fn config_blob(&self) -> Result<Vec<u8>> {
        Ok(b"{}".to_vec())
    }

    fn layer_infos(&self) -> Vec<LayerInfo> {
        vec![LayerInfo {
            digest: "sha256:aaaa".to_string(),
            size: 42,
            media_type: "application/vnd.docker.image.rootfs.diff.tar.gzip".to_string(),
        }]
    }

    fn digest(&self) -> Option<String> {
        self.digest.clone()
    }
}

/// Builder double that stashes the source it was given, so tests can
/// observe the source lifecycle after open returns.
struct MockBuilder {
    fail: bool,
    seen_source: Mutex<Option<Arc<dyn ImageSource>>>,
}

impl MockBuilder {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            seen_source: Mutex::new(None),
        }
    }

    fn source(&self) -> Arc<dyn ImageSource> {
        self.seen_source.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl ImageBuilder for MockBuilder {
    async fn from_source(&self, source: Arc<dyn ImageSource>) -> Result<Box<dyn Image>> {
        *self.seen_source.lock().unwrap() = Some(source);
        if self.fail {
            return Err(RegistryError::ImageBuild {
                message: "unsupported manifest format".to_string(),
            });
        }
        Ok(Box::new(MockImage {
            digest: Some("sha256:bbbb".to_string()),
        }))
    }
}

fn reference() -> RepositoryReference {
    RepositoryReference::new("registry.example.com", "library/app").with_tag("v1")
}

#[tokio::test]
async fn open_composes_generic_image_with_registry_extensions() {
    let transport = DockerTransport::new(Arc::new(MockExecutor::new(vec![])));
    let builder = MockBuilder::new(false);

    let image = transport.open_image(&builder, &reference()).await.unwrap();

    assert_eq!(
        image.source_ref_full_name(),
        "registry.example.com/library/app"
    );
    assert_eq!(image.digest(), Some("sha256:bbbb".to_string()));
    assert_eq!(image.layer_infos().len(), 1);
    assert!(!image.manifest().await.unwrap().is_empty());

    image.close().await.unwrap();
}

#[tokio::test]
async fn repository_tags_ignore_the_tag_used_to_open() {
    let executor = Arc::new(MockExecutor::new(vec![
        Ok(page(
            200,
            r#"{"Tags":["v1","v2"]}"#,
            Some("</v2/library/app/tags/list?last=v2>; rel=\"next\""),
        )),
        Ok(page(200, r#"{"Tags":["v3"]}"#, None)),
    ]));
    let transport = DockerTransport::new(executor.clone());
    let builder = MockBuilder::new(false);

    let image = transport.open_image(&builder, &reference()).await.unwrap();
    let tags = image.get_repository_tags().await.unwrap();

    assert_eq!(tags, vec!["v1", "v2", "v3"]);
    // The listing path is derived from the repository alone.
    assert_eq!(executor.request_log()[0], "/v2/library/app/tags/list");

    image.close().await.unwrap();
}

#[tokio::test]
async fn close_releases_the_source_exactly_once() {
    let transport = DockerTransport::new(Arc::new(MockExecutor::new(vec![])));
    let builder = MockBuilder::new(false);

    let image = transport.open_image(&builder, &reference()).await.unwrap();
    let source = builder.source();

    image.close().await.unwrap();

    let err = source.close().await.unwrap_err();
    assert!(matches!(err, RegistryError::ResourceRelease { .. }));
}

#[tokio::test]
async fn handle_formats_for_diagnostics() {
    let transport = DockerTransport::new(Arc::new(MockExecutor::new(vec![])));
    let builder = MockBuilder::new(false);

    let image = transport.open_image(&builder, &reference()).await.unwrap();
    assert!(format!("{:?}", image).contains("library/app"));

    image.close().await.unwrap();
}

#[tokio::test]
async fn builder_failure_closes_the_opened_source() {
    let transport = DockerTransport::new(Arc::new(MockExecutor::new(vec![])));
    let builder = MockBuilder::new(true);

    let err = transport
        .open_image(&builder, &reference())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ImageBuild { .. }));

    // The transport already released the source on the failure path.
    let source = builder.source();
    let err = source.close().await.unwrap_err();
    assert!(matches!(err, RegistryError::ResourceRelease { .. }));
}

/// Builder double that releases the source itself before failing, so the
/// transport's own release attempt fails too.
struct ClosingBuilder;

#[async_trait]
impl ImageBuilder for ClosingBuilder {
    async fn from_source(&self, source: Arc<dyn ImageSource>) -> Result<Box<dyn Image>> {
        source.close().await.unwrap();
        Err(RegistryError::ImageBuild {
            message: "unsupported manifest format".to_string(),
        })
    }
}

#[tokio::test]
async fn failed_release_does_not_mask_the_build_error() {
    let transport = DockerTransport::new(Arc::new(MockExecutor::new(vec![])));

    let err = transport
        .open_image(&ClosingBuilder, &reference())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::ImageBuild { .. }));
}
