//! Pluggable image-source transports
//!
//! A [`Transport`] knows how to resolve a reference under one scheme name
//! into an image source. The [`TransportRegistry`] is the process-wide
//! table of scheme name to transport; it is populated once during startup
//! and shared read-only afterwards. Builds that exclude a backend register
//! a [`StubTransport`] under the same scheme so callers get a clear
//! "not supported in this build" error instead of "unknown scheme".

use crate::error::{RegistryError, Result};
use crate::image::ImageSource;
use crate::reference::RepositoryReference;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identity of one registered transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDescriptor {
    scheme: String,
    stub: bool,
}

impl TransportDescriptor {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            stub: false,
        }
    }

    pub fn stub(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            stub: true,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// True when the real backend was excluded from this build.
    pub fn is_stub(&self) -> bool {
        self.stub
    }
}

/// Capability contract every backend implements.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    fn descriptor(&self) -> &TransportDescriptor;

    /// Open a source handle for the given reference.
    async fn open_source(
        &self,
        reference: &RepositoryReference,
    ) -> Result<Arc<dyn ImageSource>>;
}

/// Scheme name to transport lookup table.
///
/// Registration takes `&mut self`, so population happens before the table
/// is shared; once wrapped in an `Arc` it is safe to read concurrently.
#[derive(Default)]
pub struct TransportRegistry {
    transports: BTreeMap<String, Arc<dyn Transport>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transport under its descriptor's scheme name.
    ///
    /// A second registration under the same scheme is rejected; the
    /// existing binding is never overwritten.
    pub fn register(&mut self, transport: Arc<dyn Transport>) -> Result<()> {
        let scheme = transport.descriptor().scheme().to_string();
        if self.transports.contains_key(&scheme) {
            return Err(RegistryError::DuplicateScheme { scheme });
        }
        self.transports.insert(scheme, transport);
        Ok(())
    }

    /// Look up the transport bound to a scheme name.
    pub fn get(&self, scheme: &str) -> Result<Arc<dyn Transport>> {
        self.transports
            .get(scheme)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownScheme {
                scheme: scheme.to_string(),
            })
    }

    /// All registered scheme names, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        self.transports.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

/// Transport that registers a scheme name but fails every operational call.
///
/// Used when the real backend is compiled out, keeping the recognized
/// scheme set stable across builds.
#[derive(Debug)]
pub struct StubTransport {
    descriptor: TransportDescriptor,
}

impl StubTransport {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            descriptor: TransportDescriptor::stub(scheme),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn descriptor(&self) -> &TransportDescriptor {
        &self.descriptor
    }

    async fn open_source(
        &self,
        _reference: &RepositoryReference,
    ) -> Result<Arc<dyn ImageSource>> {
        Err(RegistryError::TransportUnsupported {
            scheme: self.descriptor.scheme().to_string(),
        })
    }
}
