use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::BackendClient;
use crate::core::types::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
use crate::providers::dify_translate;
use crate::registry::ModelRegistry;
use crate::streaming;

/// Request dispatcher: resolves the model credential, calls the backend once
/// and maps the answer back into the OpenAI schema.
pub struct Gateway {
    application_name: String,
    registry: ModelRegistry,
    backend: Arc<dyn BackendClient>,
}

pub struct GatewayBuilder {
    application_name: Option<String>,
    credentials: IndexMap<String, String>,
    backend: Option<Arc<dyn BackendClient>>,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder {
            application_name: None,
            credentials: IndexMap::new(),
            backend: None,
        }
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let credential = self.registry.resolve_credential(&request.model).inspect_err(|_| {
            warn!(model = %request.model, "rejected request for unsupported model");
        })?;

        if request.messages.is_empty() {
            warn!(model = %request.model, "rejected request without messages");
            return Err(GatewayError::EmptyMessages);
        }

        let backend_request = dify_translate::to_backend_request(request, &self.application_name);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            query_len = backend_request.query.len(),
            "forwarding chat request to backend"
        );

        let backend_response = self
            .backend
            .chat(&backend_request, credential)
            .await
            .map_err(|backend_error| {
                error!(model = %request.model, error = %backend_error, "backend call failed");
                GatewayError::Backend(backend_error)
            })?;

        let response = dify_translate::to_outbound_response(&backend_response, &request.model);
        info!(
            model = %response.model,
            id = %response.id,
            total_tokens = response.usage.total_tokens,
            "chat completion finished"
        );

        Ok(response)
    }

    /// Runs `complete` and replays the answer as chunks. The backend has
    /// returned in full before the first chunk exists.
    pub async fn complete_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Vec<ChatCompletionChunk>, GatewayError> {
        let response = self.complete(request).await?;
        let chunks = streaming::to_stream_chunks(&response);
        debug!(id = %response.id, chunks = chunks.len(), "synthesized stream chunks");
        Ok(chunks)
    }
}

impl GatewayBuilder {
    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = Some(application_name.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, credential: impl Into<String>) -> Self {
        self.credentials.insert(model.into(), credential.into());
        self
    }

    pub fn with_models(mut self, credentials: IndexMap<String, String>) -> Self {
        self.credentials.extend(credentials);
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn BackendClient>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Result<Gateway, ConfigError> {
        let application_name = self
            .application_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ConfigError::MissingApplicationName)?;
        let registry = ModelRegistry::new(self.credentials)?;
        let backend = self.backend.ok_or(ConfigError::MissingBackend)?;

        Ok(Gateway {
            application_name,
            registry,
            backend,
        })
    }
}
