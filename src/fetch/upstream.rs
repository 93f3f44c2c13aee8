//! Upstream recipe API client

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::FetchError;

/// JSON client for the recipe lookup API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Created upstream client for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint under the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` with `query` and decode the body as a JSON object.
    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(FetchError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(FetchError::Unreachable)?;

        parse_object(&body)
    }
}

/// Decodes an upstream body, accepting only a top-level JSON object.
fn parse_object(body: &[u8]) -> Result<Value, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    if !value.is_object() {
        return Err(FetchError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}
