//! Registry-backed image handle
//!
//! [`DockerTransport`] is the real registry backend. It opens
//! [`DockerImageSource`] handles and composes them with an externally
//! built generic image into a [`RegistryImage`], which adds the two
//! registry-specific operations on top of the generic capability set.

use crate::error::{RegistryError, Result};
use crate::image::{Image, ImageBuilder, ImageSource, LayerInfo};
use crate::logging::Logger;
use crate::reference::RepositoryReference;
use crate::registry::client::RequestExecutor;
use crate::registry::tags::{TagListRequest, list_tags};
use crate::transport::{Transport, TransportDescriptor};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source handle for one repository on the registry.
pub struct DockerImageSource {
    executor: Arc<dyn RequestExecutor>,
    reference: RepositoryReference,
    closed: AtomicBool,
}

impl DockerImageSource {
    fn new(executor: Arc<dyn RequestExecutor>, reference: RepositoryReference) -> Self {
        Self {
            executor,
            reference,
            closed: AtomicBool::new(false),
        }
    }

    pub fn executor(&self) -> &dyn RequestExecutor {
        &*self.executor
    }
}

impl fmt::Debug for DockerImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerImageSource")
            .field("reference", &self.reference)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

#[async_trait]
impl ImageSource for DockerImageSource {
    fn reference(&self) -> &RepositoryReference {
        &self.reference
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(RegistryError::ResourceRelease {
                message: format!("source for {} already closed", self.reference.full_name()),
            });
        }
        Ok(())
    }
}

/// The registry-backed transport, registered under scheme `docker`.
pub struct DockerTransport {
    descriptor: TransportDescriptor,
    executor: Arc<dyn RequestExecutor>,
    logger: Logger,
}

impl DockerTransport {
    pub const SCHEME: &'static str = "docker";

    /// Wrap an executor already authenticated against the registry.
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            descriptor: TransportDescriptor::new(Self::SCHEME),
            executor,
            logger: Logger::new_quiet(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Open a source for the reference and build the composed image handle.
    ///
    /// When the builder fails after the source opened, the source is closed
    /// before the build error is surfaced; a close failure at that point
    /// does not mask the build error.
    pub async fn open_image(
        &self,
        builder: &dyn ImageBuilder,
        reference: &RepositoryReference,
    ) -> Result<RegistryImage> {
        let source = Arc::new(DockerImageSource::new(
            self.executor.clone(),
            reference.clone(),
        ));
        let image = match builder.from_source(source.clone()).await {
            Ok(image) => image,
            Err(e) => {
                if let Err(close_err) = source.close().await {
                    self.logger.error(&format!(
                        "failed to release source for {} after build error: {}",
                        reference.full_name(),
                        close_err
                    ));
                }
                return Err(e);
            }
        };
        Ok(RegistryImage { image, source })
    }
}

impl fmt::Debug for DockerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerTransport")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[async_trait]
impl Transport for DockerTransport {
    fn descriptor(&self) -> &TransportDescriptor {
        &self.descriptor
    }

    async fn open_source(
        &self,
        reference: &RepositoryReference,
    ) -> Result<Arc<dyn ImageSource>> {
        Ok(Arc::new(DockerImageSource::new(
            self.executor.clone(),
            reference.clone(),
        )))
    }
}

/// A generic image plus the registry-specific extension operations.
///
/// All generic operations delegate to the externally built image; the
/// extensions talk to the registry through the source's executor.
pub struct RegistryImage {
    image: Box<dyn Image>,
    source: Arc<DockerImageSource>,
}

impl fmt::Debug for RegistryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryImage")
            .field("reference", self.source.reference())
            .finish()
    }
}

impl RegistryImage {
    /// Fully expanded name of the repository this image is in, independent
    /// of the tag or digest used to open it. Pure, no I/O.
    pub fn source_ref_full_name(&self) -> String {
        self.source.reference().full_name()
    }

    /// List all tags available in the repository.
    ///
    /// Unrelated to the tag used for this particular image. Every call
    /// re-fetches the full pagination chain; nothing is cached.
    pub async fn get_repository_tags(&self) -> Result<Vec<String>> {
        let request = TagListRequest::new(self.source.reference());
        list_tags(self.source.executor(), &request).await
    }

    /// Release the source handle. Consuming the handle makes a second
    /// close through this path unrepresentable.
    pub async fn close(self) -> Result<()> {
        self.source.close().await
    }
}

#[async_trait]
impl Image for RegistryImage {
    async fn manifest(&self) -> Result<Vec<u8>> {
        self.image.manifest().await
    }

    async fn config_blob(&self) -> Result<Vec<u8>> {
        self.image.config_blob().await
    }

    fn layer_infos(&self) -> Vec<LayerInfo> {
        self.image.layer_infos()
    }

    fn digest(&self) -> Option<String> {
        self.image.digest()
    }
}
