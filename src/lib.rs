//! Docker Image Inspector Library
//!
//! Client-side library for the Docker Registry HTTP API v2 tag-listing
//! endpoint, plus a pluggable-transport registry so the registry-backed
//! backend can coexist with alternative image-source backends. Backends
//! excluded from a build register a stub under the same scheme name and
//! fail with a clear error instead of an unknown-scheme one.

pub mod error;
pub mod image;
pub mod logging;
pub mod reference;
pub mod registry;
pub mod transport;

pub use error::{RegistryError, Result};
pub use image::{Image, ImageBuilder, ImageSource, LayerInfo};
pub use logging::Logger;
pub use reference::RepositoryReference;
pub use registry::{
    DockerImageSource, DockerTransport, HttpClient, HttpClientBuilder, RegistryImage,
    RegistryResponse, RequestExecutor, TagListRequest, list_tags,
};
pub use transport::{StubTransport, Transport, TransportDescriptor, TransportRegistry};
