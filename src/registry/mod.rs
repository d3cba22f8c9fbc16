//! Registry interaction module
//!
//! Talks to the Docker Registry HTTP API v2: the request-executor seam and
//! its reqwest-backed implementation, the paginated tag-listing algorithm,
//! and the registry-backed image handle.

pub mod client;
pub mod image;
pub mod tags;

pub use client::{HttpClient, HttpClientBuilder, RegistryResponse, RequestExecutor};
pub use image::{DockerImageSource, DockerTransport, RegistryImage};
pub use tags::{TagListRequest, list_tags};
