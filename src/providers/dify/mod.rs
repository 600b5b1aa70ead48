use async_trait::async_trait;

use crate::core::error::{BackendError, ConfigError};
use crate::core::traits::BackendClient;
use crate::core::types::{BackendRequest, BackendResponse};
use crate::transport::http::HttpTransport;

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Client for a Dify application's `chat-messages` API.
pub struct DifyClient {
    transport: HttpTransport,
    base_url: String,
}

impl DifyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_MS)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(timeout_ms)?;
        Self::with_transport(base_url, transport)
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        transport: HttpTransport,
    ) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url).ok_or(ConfigError::MissingEndpoint)?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    pub fn chat_messages_url(&self) -> String {
        format!("{}/chat-messages", self.base_url)
    }
}

#[async_trait]
impl BackendClient for DifyClient {
    async fn chat(
        &self,
        request: &BackendRequest,
        credential: &str,
    ) -> Result<BackendResponse, BackendError> {
        self.transport
            .post_json(&self.chat_messages_url(), request, Some(credential))
            .await
    }
}

fn normalize_base_url(base_url: impl Into<String>) -> Option<String> {
    let value = base_url.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.trim_end_matches('/').to_string())
}
