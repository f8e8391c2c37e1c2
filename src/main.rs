use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use farmcast::api::AppState;
use farmcast::config::LoggingConfig;
use farmcast::sensors::spawn_ingestion;
use farmcast::{AdvisorConfig, ForecastClient, SensorStore, web};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AdvisorConfig::load().context("loading configuration")?;
    init_tracing(&config.logging);
    tracing::info!("Starting farmcast {}", farmcast::VERSION);

    let store = Arc::new(SensorStore::new(&config.sensors.csv_path));
    if let Some(device) = &config.sensors.device_path {
        let interval = Duration::from_millis(config.sensors.poll_interval_ms);
        match spawn_ingestion(Path::new(device), Arc::clone(&store), interval) {
            Ok(_) => tracing::info!("Sensor ingestion started"),
            Err(e) => tracing::warn!("Sensor board not connected ({}): {}", device, e),
        }
    } else {
        tracing::info!("No sensor device configured, serving stored readings only");
    }

    let provider = Arc::new(ForecastClient::new(&config.weather));
    let state = AppState::new(provider, store);

    web::run(&config.server, state).await
}
