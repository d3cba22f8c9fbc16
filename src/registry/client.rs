//! Request executor seam and its reqwest-backed implementation
//!
//! Pagination and the image handle only ever see [`RequestExecutor`]; how
//! the connection is authenticated, secured, and retried is decided by
//! whoever builds the executor. [`HttpClient`] is the stock implementation
//! for registries speaking plain bearer-token HTTP.

use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// One registry response, body fully read.
///
/// Reading the body to completion before the next request is issued is what
/// releases the connection back to the pool, so a long pagination chain
/// cannot exhaust descriptors.
#[derive(Debug)]
pub struct RegistryResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RegistryResponse {
    /// The `Link` continuation header, if the registry sent one.
    pub fn link(&self) -> Option<&str> {
        self.headers.get(LINK).and_then(|value| value.to_str().ok())
    }
}

/// Issues authenticated requests against one registry endpoint.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// GET a registry path (absolute path plus optional query string).
    async fn get(&self, path: &str) -> Result<RegistryResponse>;
}

pub struct HttpClientBuilder {
    endpoint: String,
    auth_token: Option<String>,
    skip_tls: bool,
    logger: Logger,
}

impl HttpClientBuilder {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            auth_token: None,
            skip_tls: false,
            logger: Logger::new_quiet(),
        }
    }

    /// Bearer token obtained out of band, attached to every request.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = if self.skip_tls {
            Client::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
        } else {
            Client::builder().build()
        }
        .map_err(|e| RegistryError::Network {
            path: self.endpoint.clone(),
            message: format!("failed to create HTTP client: {}", e),
        })?;

        let endpoint = Url::parse(&self.endpoint).map_err(|e| RegistryError::Network {
            path: self.endpoint.clone(),
            message: format!("invalid registry endpoint: {}", e),
        })?;

        Ok(HttpClient {
            client,
            endpoint,
            auth_token: self.auth_token,
            logger: self.logger,
        })
    }
}

/// reqwest-backed executor for one registry endpoint.
pub struct HttpClient {
    client: Client,
    endpoint: Url,
    auth_token: Option<String>,
    logger: Logger,
}

impl HttpClient {
    pub fn builder(endpoint: String) -> HttpClientBuilder {
        HttpClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RequestExecutor for HttpClient {
    async fn get(&self, path: &str) -> Result<RegistryResponse> {
        let url = self.endpoint.join(path).map_err(|e| RegistryError::Network {
            path: path.to_string(),
            message: format!("invalid request path: {}", e),
        })?;

        self.logger.verbose(&format!("GET {}", url));

        let mut request = self.client.get(url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| RegistryError::Network {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Network {
                path: path.to_string(),
                message: format!("failed to read response body: {}", e),
            })?
            .to_vec();

        if status >= 400 {
            self.logger
                .warning(&format!("{} returned status {}", path, status));
        } else {
            self.logger.debug(&format!("{} returned status {}", path, status));
        }

        Ok(RegistryResponse {
            status,
            headers,
            body,
        })
    }
}
