//! Gateway configuration from a YAML file with an environment fallback.
//!
//! ```yaml
//! application_name: my-app
//! dify_api_endpoint: https://api.dify.ai/v1
//! cors_origin: "*"
//! models:
//!   model-1: app-key-1
//!   model-2: app-key-2
//! ```
//!
//! When the file cannot be read, `.env` is loaded and `APPLICATION_NAME`,
//! `DIFY_API_ENDPOINT`, `DIFY_API_KEY`, `CORS_ORIGIN`, `HOST`, `PORT` and
//! `REQUEST_TIMEOUT_MS` are consulted instead. The single key is bound to
//! `default-model`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::ConfigError;
use crate::providers::dify::DEFAULT_TIMEOUT_MS;

pub const CONFIG_PATH_ENV: &str = "DIFY_GATEWAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_APPLICATION_NAME: &str = "default-app";
pub const DEFAULT_MODEL_NAME: &str = "default-model";
pub const DEFAULT_CORS_ORIGIN: &str = "*";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

const APPLICATION_NAME_ENV: &str = "APPLICATION_NAME";
const DIFY_API_ENDPOINT_ENV: &str = "DIFY_API_ENDPOINT";
const DIFY_API_KEY_ENV: &str = "DIFY_API_KEY";
const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";
const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const REQUEST_TIMEOUT_MS_ENV: &str = "REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub application_name: String,
    pub dify_api_endpoint: String,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub models: IndexMap<String, String>,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl GatewayConfig {
    /// Resolves the config path from `DIFY_GATEWAY_CONFIG` and loads it.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Reads `path` as YAML. If the file cannot be read, falls back to the
    /// environment. A file that exists but fails to parse is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_yaml_str(&contents, path)?;
                info!(path = %path.display(), "loaded gateway config file");
                Ok((config, ConfigSource::File(path.to_path_buf())))
            }
            Err(error) => {
                info!(
                    path = %path.display(),
                    error = %error,
                    "config file unavailable; falling back to environment"
                );
                let _ = dotenvy::dotenv();
                Ok((Self::from_env(), ConfigSource::Environment))
            }
        }
    }

    pub fn from_yaml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|error| ConfigError::Parse {
            path: path.display().to_string(),
            message: error.to_string(),
        })
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the environment-derived config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut models = IndexMap::new();
        models.insert(
            DEFAULT_MODEL_NAME.to_string(),
            lookup(DIFY_API_KEY_ENV).unwrap_or_default(),
        );

        Self {
            application_name: lookup(APPLICATION_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string()),
            dify_api_endpoint: lookup(DIFY_API_ENDPOINT_ENV).unwrap_or_default(),
            cors_origin: lookup(CORS_ORIGIN_ENV).unwrap_or_else(default_cors_origin),
            host: lookup(HOST_ENV).unwrap_or_else(default_host),
            port: lookup(PORT_ENV)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            request_timeout_ms: lookup(REQUEST_TIMEOUT_MS_ENV)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            models,
        }
    }

    /// Checks the invariants the request path relies on. Must pass before
    /// the server binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.trim().is_empty() {
            return Err(ConfigError::MissingApplicationName);
        }
        if self.dify_api_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        if self.models.keys().any(|model| model.trim().is_empty()) {
            return Err(ConfigError::BlankModelName);
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                timeout_ms: self.request_timeout_ms,
            });
        }
        if self.cors_origin.trim().is_empty() {
            return Err(ConfigError::InvalidCorsOrigin {
                origin: self.cors_origin.clone(),
                reason: "must not be blank".to_string(),
            });
        }

        for (model, key) in &self.models {
            if key.trim().is_empty() {
                warn!(model = %model, "model has an empty backend credential");
            }
        }

        Ok(())
    }
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
