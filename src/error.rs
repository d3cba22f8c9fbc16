//! Error types for registry and transport operations
//!
//! Every failure is terminal to the in-flight operation; retry policy
//! belongs to whoever constructed the request executor. Pagination-stage
//! errors carry the registry path so a failure mid-chain is diagnosable.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Transport-level failure (connection, TLS, timeout). No partial result.
    #[error("network error requesting {path}: {message}")]
    Network { path: String, message: String },

    /// Registry answered with a non-200 status.
    #[error("invalid status code {status} returned when fetching {path}")]
    HttpStatus { status: u16, path: String },

    /// Response body was not the expected JSON shape.
    #[error("error decoding response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The Link continuation header did not contain a usable URL.
    #[error("malformed pagination link {link:?}: {message}")]
    PaginationLink { link: String, message: String },

    /// The defensive page ceiling was reached before the chain ended.
    #[error("tag pagination exceeded {limit} pages at {path}")]
    PageLimit { limit: usize, path: String },

    /// The scheme is recognized but its backend was excluded from this build.
    #[error("transport \"{scheme}\" is not supported in this build")]
    TransportUnsupported { scheme: String },

    /// A transport was already registered under this scheme name.
    #[error("transport scheme \"{scheme}\" is already registered")]
    DuplicateScheme { scheme: String },

    /// No transport is registered under this scheme name.
    #[error("unknown transport scheme \"{scheme}\"")]
    UnknownScheme { scheme: String },

    /// Releasing an image source failed or happened more than once.
    #[error("failed to release image source: {message}")]
    ResourceRelease { message: String },

    /// The external image builder rejected the source.
    #[error("image build error: {message}")]
    ImageBuild { message: String },
}

impl RegistryError {
    /// Registry path the failing request targeted, where one applies.
    pub fn path(&self) -> Option<&str> {
        match self {
            RegistryError::Network { path, .. }
            | RegistryError::HttpStatus { path, .. }
            | RegistryError::Decode { path, .. }
            | RegistryError::PageLimit { path, .. } => Some(path),
            _ => None,
        }
    }
}
