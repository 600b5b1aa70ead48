use super::*;

#[test]
fn test_config_error_display_messages() {
    assert_eq!(
        ConfigError::Parse {
            path: "config.yaml".to_string(),
            message: "bad indent".to_string(),
        }
        .to_string(),
        "failed to parse config file config.yaml: bad indent"
    );
    assert_eq!(
        ConfigError::MissingEndpoint.to_string(),
        "missing backend endpoint"
    );
    assert_eq!(
        ConfigError::InvalidTimeout { timeout_ms: 0 }.to_string(),
        "invalid timeout: 0 ms"
    );
}

#[test]
fn test_backend_error_display_messages() {
    let transport = BackendError::Transport {
        message: "connection refused".to_string(),
    };
    assert_eq!(
        transport.to_string(),
        "backend transport error: connection refused"
    );

    let status = BackendError::Status {
        status_code: 401,
        request_id: Some("req_123".to_string()),
        message: "invalid api key".to_string(),
    };
    assert_eq!(
        status.to_string(),
        "backend status error [request_id=req_123, status_code=401]: invalid api key"
    );

    let serialization = BackendError::Serialization {
        request_id: None,
        message: "missing field `answer`".to_string(),
    };
    assert_eq!(
        serialization.to_string(),
        "backend serialization error: missing field `answer`"
    );

    assert_eq!(
        BackendError::Timeout { timeout_ms: 1_500 }.to_string(),
        "backend timed out after 1500 ms"
    );
}

#[test]
fn test_gateway_error_public_messages() {
    let unsupported = GatewayError::UnsupportedModel {
        model: "unsupported-model".to_string(),
    };
    assert!(unsupported.is_client_error());
    assert_eq!(
        unsupported.public_message(),
        "Unsupported model: unsupported-model"
    );

    assert_eq!(
        GatewayError::EmptyMessages.public_message(),
        "Messages must not be empty"
    );

    let invalid = GatewayError::InvalidRequest {
        message: "expected value at line 1 column 1".to_string(),
    };
    assert_eq!(invalid.public_message(), "Invalid request body");
}

#[test]
fn test_gateway_error_hides_backend_details() {
    let backend: GatewayError = BackendError::Status {
        status_code: 500,
        request_id: Some("req_secret".to_string()),
        message: "stack trace from upstream".to_string(),
    }
    .into();

    assert!(!backend.is_client_error());
    assert_eq!(backend.public_message(), INTERNAL_ERROR_MESSAGE);
    assert!(backend.to_string().contains("stack trace from upstream"));

    let encoding = GatewayError::StreamEncoding {
        message: "boom".to_string(),
    };
    assert_eq!(encoding.public_message(), "Internal server error");
}
