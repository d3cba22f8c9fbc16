//! Repository reference value type
//!
//! A [`RepositoryReference`] names a repository on one registry, optionally
//! pinned to a tag or digest. It is immutable once built; parsing reference
//! strings into this shape is the caller's concern.

/// A parsed reference to a repository on a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    registry: String,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl RepositoryReference {
    pub fn new(registry: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            repository: repository.into(),
            tag: None,
            digest: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Registry host this reference points at.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Repository path component, e.g. `library/alpine`.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Fully expanded repository name, independent of tag or digest.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.registry, self.repository)
    }
}
