//! Generic image abstraction consumed by the registry-backed handle
//!
//! These traits are the seam to the external collaborators: a transport
//! opens an [`ImageSource`], an [`ImageBuilder`] turns that source into a
//! generic [`Image`], and the registry wrapper composes the two. This crate
//! does not parse manifests itself.

use crate::error::Result;
use crate::reference::RepositoryReference;
use async_trait::async_trait;
use std::sync::Arc;

/// A handle onto one image source, owned by whoever opened it.
///
/// Closing releases the underlying handle; it must happen exactly once.
#[async_trait]
pub trait ImageSource: Send + Sync + std::fmt::Debug {
    /// Reference the source was opened for.
    fn reference(&self) -> &RepositoryReference;

    /// Release the source handle.
    async fn close(&self) -> Result<()>;
}

/// Layer metadata reported by a generic image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub digest: String,
    pub size: u64,
    pub media_type: String,
}

/// The generic capability set every built image exposes.
#[async_trait]
pub trait Image: Send + Sync {
    /// Raw manifest bytes.
    async fn manifest(&self) -> Result<Vec<u8>>;

    /// Raw image configuration blob.
    async fn config_blob(&self) -> Result<Vec<u8>>;

    /// Layer descriptors in manifest order.
    fn layer_infos(&self) -> Vec<LayerInfo>;

    /// Manifest digest, when the source reported one.
    fn digest(&self) -> Option<String>;
}

/// External builder that wraps a source into a generic image.
#[async_trait]
pub trait ImageBuilder: Send + Sync {
    async fn from_source(&self, source: Arc<dyn ImageSource>) -> Result<Box<dyn Image>>;
}
