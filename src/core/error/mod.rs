use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("missing application name")]
    MissingApplicationName,
    #[error("missing backend endpoint")]
    MissingEndpoint,
    #[error("no models configured")]
    NoModels,
    #[error("model name must not be blank")]
    BlankModelName,
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid cors origin {origin}: {reason}")]
    InvalidCorsOrigin { origin: String, reason: String },
    #[error("missing backend client")]
    MissingBackend,
}

/// Failure of the single blocking call to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error(
        "backend transport error{context}: {message}",
        context = format_context(None, None)
    )]
    Transport { message: String },
    #[error("backend timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error(
        "backend status error{context}: {message}",
        context = format_context(.request_id.as_deref(), Some(*.status_code))
    )]
    Status {
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "backend protocol error{context}: {message}",
        context = format_context(.request_id.as_deref(), None)
    )]
    Protocol {
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "backend serialization error{context}: {message}",
        context = format_context(.request_id.as_deref(), None)
    )]
    Serialization {
        request_id: Option<String>,
        message: String,
    },
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Unsupported model: {model}")]
    UnsupportedModel { model: String },
    #[error("Messages must not be empty")]
    EmptyMessages,
    #[error("Invalid request body")]
    InvalidRequest { message: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("stream encoding error: {message}")]
    StreamEncoding { message: String },
}

impl GatewayError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel { .. } | Self::EmptyMessages | Self::InvalidRequest { .. }
        )
    }

    /// Message safe to hand back to the caller. Server-side failures collapse
    /// to a fixed literal so backend details never reach the client.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

fn format_context(request_id: Option<&str>, status_code: Option<u16>) -> String {
    let mut context = Vec::new();

    if let Some(request_id) = request_id {
        context.push(format!("request_id={request_id}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    if context.is_empty() {
        String::new()
    } else {
        format!(" [{}]", context.join(", "))
    }
}

#[cfg(test)]
mod tests;
