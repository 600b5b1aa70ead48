use std::sync::Arc;

use dify_gateway::Gateway;
use dify_gateway::config::{ConfigSource, GatewayConfig};
use dify_gateway::providers::dify::DifyClient;
use dify_gateway::server::{GatewayServer, shutdown_signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, source) = GatewayConfig::load()?;
    config.validate()?;

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "using config file"),
        ConfigSource::Environment => info!("using environment configuration"),
    }
    info!(
        application = %config.application_name,
        endpoint = %config.dify_api_endpoint,
        models = config.models.len(),
        timeout_ms = config.request_timeout_ms,
        "starting dify-gateway"
    );

    let backend = DifyClient::with_timeout(&config.dify_api_endpoint, config.request_timeout_ms)?;
    let gateway = Gateway::builder()
        .with_application_name(&config.application_name)
        .with_models(config.models.clone())
        .with_backend(Arc::new(backend))
        .build()?;

    GatewayServer::new(gateway)
        .with_cors_origin(&config.cors_origin)
        .serve(&config.host, config.port, shutdown_signal())
        .await?;

    Ok(())
}
