//! Shared test doubles for registry integration tests

use async_trait::async_trait;
use docker_image_inspector::{RegistryError, RegistryResponse, RequestExecutor, Result};
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Request executor that replays scripted responses and records every
/// request path it receives.
pub struct MockExecutor {
    responses: Mutex<VecDeque<Result<RegistryResponse>>>,
    requests: Mutex<Vec<String>>,
}

impl MockExecutor {
    pub fn new(responses: Vec<Result<RegistryResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_log(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn get(&self, path: &str) -> Result<RegistryResponse> {
        self.requests.lock().unwrap().push(path.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RegistryError::Network {
                    path: path.to_string(),
                    message: "no scripted response".to_string(),
                })
            })
    }
}

/// Build a scripted response with an optional `Link` header.
pub fn page(status: u16, body: &str, link: Option<&str>) -> RegistryResponse {
    let mut headers = HeaderMap::new();
    if let Some(link) = link {
        headers.insert(LINK, HeaderValue::from_str(link).unwrap());
    }
    RegistryResponse {
        status,
        headers,
        body: body.as_bytes().to_vec(),
    }
}
