//! Axum HTTP surface.
//!
//! - `POST /v1/chat/completions`
//! - `GET /v1/models`
//! - `GET /health`

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::error::{ConfigError, GatewayError, ServerError};
use crate::core::types::{ChatCompletionChunk, ChatCompletionRequest};
use crate::runtime::Gateway;
use crate::streaming;

const ANY_ORIGIN: &str = "*";

struct AppState {
    gateway: Gateway,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ModelList {
    object: &'static str,
    data: Vec<ModelCard>,
}

#[derive(Debug, Serialize)]
struct ModelCard {
    id: String,
    object: &'static str,
    owned_by: String,
}

pub struct GatewayServer {
    gateway: Gateway,
    cors_origin: String,
}

impl GatewayServer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            cors_origin: ANY_ORIGIN.to_string(),
        }
    }

    pub fn with_cors_origin(mut self, cors_origin: impl Into<String>) -> Self {
        self.cors_origin = cors_origin.into();
        self
    }

    pub fn router(self) -> Result<Router, ConfigError> {
        let cors = cors_layer(&self.cors_origin)?;
        let state = Arc::new(AppState {
            gateway: self.gateway,
        });

        Ok(Router::new()
            .route("/v1/chat/completions", post(chat_completions_handler))
            .route("/v1/models", get(models_handler))
            .route("/health", get(health_handler))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state))
    }

    /// Binds `host:port` and serves until `shutdown` resolves. In-flight
    /// requests are allowed to finish.
    pub async fn serve<F>(self, host: &str, port: u16, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router()?;
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!(addr = %addr, "dify-gateway listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("dify-gateway stopped");
        Ok(())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

async fn chat_completions_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected malformed chat completion request");
            return GatewayError::InvalidRequest {
                message: rejection.body_text(),
            }
            .into_response();
        }
    };

    if request.stream {
        match state.gateway.complete_stream(&request).await {
            Ok(chunks) => sse_response(&chunks),
            Err(error) => error.into_response(),
        }
    } else {
        match state.gateway.complete(&request).await {
            Ok(response) => Json(response).into_response(),
            Err(error) => error.into_response(),
        }
    }
}

async fn models_handler(State(state): State<Arc<AppState>>) -> Json<ModelList> {
    let owned_by = state.gateway.application_name().to_string();
    let data = state
        .gateway
        .registry()
        .models()
        .map(|model| ModelCard {
            id: model.to_string(),
            object: "model",
            owned_by: owned_by.clone(),
        })
        .collect();

    Json(ModelList {
        object: "list",
        data,
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn sse_response(chunks: &[ChatCompletionChunk]) -> Response {
    let frames = match streaming::render_sse_frames(chunks) {
        Ok(frames) => frames,
        Err(error) => {
            error!(error = %error, "failed to encode stream chunks");
            return error.into_response();
        }
    };

    let body = Body::from_stream(futures::stream::iter(
        frames.into_iter().map(Ok::<_, Infallible>),
    ));

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let trimmed = origin.trim();
    let allow_origin = if trimmed == ANY_ORIGIN {
        AllowOrigin::from(Any)
    } else {
        let value =
            HeaderValue::from_str(trimmed).map_err(|error| ConfigError::InvalidCorsOrigin {
                origin: origin.to_string(),
                reason: error.to_string(),
            })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(error = %error, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(error = %error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
