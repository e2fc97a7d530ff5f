//! CropSight gateway entry point.

use std::sync::Arc;

use anyhow::Context;
use secrecy::Secret;

use cropsight_core::config::AppConfig;
use cropsight_core::CropDetector;
use cropsight_gateway::{GatewayConfig, GatewayServer};
use cropsight_vision::OpenAiVisionClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cropsight=debug".into()),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let api_key = config
        .vision
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok().map(Secret::new))
        .context("no API key configured; set OPENAI_API_KEY or vision.api_key")?;

    let client = OpenAiVisionClient::new(api_key, &config.vision);
    let detector = CropDetector::new(Arc::new(client));

    tracing::info!(model = %config.vision.model, "CropSight gateway starting");

    let gateway_config = GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        ..GatewayConfig::default()
    };

    GatewayServer::new(gateway_config, detector, config.upload)
        .run()
        .await
}
