use indexmap::IndexMap;

use crate::core::error::{ConfigError, GatewayError};

/// Immutable model name to backend credential table.
///
/// Built once from configuration; lookups are read-only so the table can be
/// shared across request tasks without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    credentials: IndexMap<String, String>,
}

impl ModelRegistry {
    pub fn new(credentials: IndexMap<String, String>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::NoModels);
        }
        if credentials.keys().any(|model| model.trim().is_empty()) {
            return Err(ConfigError::BlankModelName);
        }

        Ok(Self { credentials })
    }

    pub fn resolve_credential(&self, model: &str) -> Result<&str, GatewayError> {
        self.credentials
            .get(model)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::UnsupportedModel {
                model: model.to_string(),
            })
    }

    /// Configured model names, in configuration order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.credentials.keys().map(String::as_str)
    }
}
