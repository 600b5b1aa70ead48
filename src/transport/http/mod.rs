use std::time::Duration;

use reqwest::Response;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::{BackendError, ConfigError};

const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// JSON-over-HTTP client with a bounded per-request timeout.
///
/// Each call is a single attempt. Non-success statuses, transport failures and
/// undecodable bodies are all reported as `BackendError`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms)
    }

    pub fn with_client(client: reqwest::Client, timeout_ms: u64) -> Result<Self, ConfigError> {
        Self::validate_timeout(timeout_ms)?;

        Ok(Self { client, timeout_ms })
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub async fn post_json<TReq, TResp>(
        &self,
        url: &str,
        body: &TReq,
        bearer_token: Option<&str>,
    ) -> Result<TResp, BackendError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|error| BackendError::Serialization {
            request_id: None,
            message: error.to_string(),
        })?;

        let headers = build_headers(bearer_token)?;
        let request_id_header = HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER);

        let response = self
            .client
            .post(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|error| self.map_send_error(&error))?;

        let request_id = extract_request_id(response.headers(), &request_id_header);
        let status_code = response.status().as_u16();

        if !response.status().is_success() {
            return Err(build_status_error(status_code, request_id, response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| self.map_send_error(&error))?;

        serde_json::from_slice::<TResp>(&bytes).map_err(|error| BackendError::Serialization {
            request_id,
            message: error.to_string(),
        })
    }

    fn map_send_error(&self, error: &reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            BackendError::Transport {
                message: error.to_string(),
            }
        }
    }

    fn validate_timeout(timeout_ms: u64) -> Result<(), ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }
        Ok(())
    }
}

fn build_headers(bearer_token: Option<&str>) -> Result<HeaderMap, BackendError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = bearer_token {
        let auth_value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
            BackendError::Protocol {
                request_id: None,
                message: format!("invalid bearer token header value: {error}"),
            }
        })?;
        headers.insert(AUTHORIZATION, auth_value);
    }
    Ok(headers)
}

async fn build_status_error(
    status_code: u16,
    request_id: Option<String>,
    response: Response,
) -> BackendError {
    let message = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => format!("http status {status_code}"),
        Err(error) => {
            format!("http status {status_code}; failed to read response body: {error}")
        }
    };

    BackendError::Status {
        status_code,
        request_id,
        message,
    }
}

fn extract_request_id(headers: &HeaderMap, request_id_header: &HeaderName) -> Option<String> {
    headers
        .get(request_id_header)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
