//! Paginated tag listing against the registry API
//!
//! `GET /v2/<repository>/tags/list` may answer in multiple pages chained by
//! `Link` headers. [`list_tags`] follows the whole chain sequentially and
//! returns the page-order concatenation of every page's tags.

use crate::error::{RegistryError, Result};
use crate::reference::RepositoryReference;
use crate::registry::client::RequestExecutor;
use http::Uri;
use serde::Deserialize;

/// Parameters for one tag-listing operation.
#[derive(Debug, Clone)]
pub struct TagListRequest<'a> {
    pub reference: &'a RepositoryReference,
    /// Defensive ceiling on the number of pages fetched. `None` trusts the
    /// registry to terminate the chain.
    pub page_limit: Option<usize>,
}

impl<'a> TagListRequest<'a> {
    pub fn new(reference: &'a RepositoryReference) -> Self {
        Self {
            reference,
            page_limit: None,
        }
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }
}

#[derive(Debug, Deserialize)]
struct TagsPage {
    #[serde(rename = "Tags", alias = "tags", default)]
    tags: Vec<String>,
}

/// List every tag in the repository, following the pagination chain.
///
/// Pages are fetched strictly in order; each page's body is fully read
/// before the next request goes out. Tags are appended in response order
/// and never deduplicated or sorted. Any failure mid-chain, including a
/// malformed continuation link, fails the whole operation and discards the
/// tags accumulated so far.
pub async fn list_tags(
    executor: &dyn RequestExecutor,
    request: &TagListRequest<'_>,
) -> Result<Vec<String>> {
    let mut path = tags_path(request.reference.repository());
    let mut tags: Vec<String> = Vec::new();
    let mut pages = 0usize;

    loop {
        if let Some(limit) = request.page_limit {
            if pages == limit {
                return Err(RegistryError::PageLimit { limit, path });
            }
        }

        let response = executor.get(&path).await?;
        pages += 1;

        if response.status != 200 {
            return Err(RegistryError::HttpStatus {
                status: response.status,
                path,
            });
        }

        let page: TagsPage =
            serde_json::from_slice(&response.body).map_err(|e| RegistryError::Decode {
                path: path.clone(),
                message: e.to_string(),
            })?;
        tags.extend(page.tags);

        match response.link() {
            Some(link) => path = continuation_from_link(link)?,
            None => break,
        }
    }

    Ok(tags)
}

fn tags_path(repository: &str) -> String {
    format!("/v2/{}/tags/list", repository)
}

/// Extract the next request target from a `Link` header value.
///
/// The header has the shape `<url>; rel="next"`; the URL may be relative or
/// absolute. Only the path and query survive, so continuation always
/// targets the endpoint the executor already talks to.
fn continuation_from_link(link: &str) -> Result<String> {
    let raw = link
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>');

    if raw.is_empty() {
        return Err(RegistryError::PaginationLink {
            link: link.to_string(),
            message: "empty continuation URL".to_string(),
        });
    }

    let uri: Uri = raw.parse().map_err(|e: http::uri::InvalidUri| {
        RegistryError::PaginationLink {
            link: link.to_string(),
            message: e.to_string(),
        }
    })?;

    let mut next = uri.path().to_string();
    if let Some(query) = uri.query() {
        next.push('?');
        next.push_str(query);
    }
    Ok(next)
}
