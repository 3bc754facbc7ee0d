use actix_web::{App, HttpServer};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod auth;
mod config;
mod domain;
mod metrics;
mod repository;
mod utils;

#[cfg(test)]
mod test_support;

use api::ApiState;
use auth::JwtService;
use config::{AppConfig, StorageBackend};
use metrics::Metrics;
use repository::{CatalogRepository, InMemoryStore, OrderRepository, PostgresStore, UserRepository};
use utils::{retry_on_transient, RetryConfig, RetryResult};

type Repositories = (
    Arc<dyn CatalogRepository>,
    Arc<dyn OrderRepository>,
    Arc<dyn UserRepository>,
);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config_path = AppConfig::path();
    let config = AppConfig::load(&config_path)?;

    // Initialize structured logging with environment-based filtering
    // Defaults to `log.filter` from the config, can be overridden with RUST_LOG
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    tracing::info!("🚀 Starting food delivery backend");
    if Path::new(&config_path).exists() {
        tracing::info!(path = %config_path, "Configuration loaded");
    } else {
        tracing::warn!(path = %config_path, "Config file not found, using defaults");
    }

    // === 1. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created");

    // === 2. Storage backend ===
    let (catalog, orders, users) = build_repositories(&config, &metrics).await?;

    // === 3. Services and HTTP API ===
    let state = ApiState::new(
        catalog,
        orders,
        users,
        JwtService::with_config(config.jwt.clone()),
        Some(metrics.clone()),
    );

    tracing::info!(
        "🌐 Starting API server on http://{}:{}/api",
        config.server.host,
        config.server.port
    );
    let api_server = HttpServer::new(move || {
        let state = state.clone();
        App::new().configure(move |cfg| state.configure(cfg))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run();

    // === 4. Run until either server stops ===
    if config.metrics.enabled {
        let metrics_server = metrics::start_metrics_server(
            Arc::new(metrics.registry().clone()),
            &config.server.host,
            config.metrics.port,
        )?;
        tokio::try_join!(api_server, metrics_server)?;
    } else {
        api_server.await?;
    }

    tracing::info!("👋 Shutdown complete");
    Ok(())
}

async fn build_repositories(config: &AppConfig, metrics: &Metrics) -> anyhow::Result<Repositories> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            Ok((store.clone(), store.clone(), store))
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to PostgreSQL...");
            let url = config.database.url.as_str();
            let max_connections = config.database.max_connections;

            let result = retry_on_transient(
                RetryConfig::startup(config.database.connect_retries),
                move |attempt| {
                    metrics.record_retry_attempt("database_connect", attempt);
                    PostgresStore::connect(url, max_connections)
                },
            )
            .await;
            metrics.record_retry_outcome("database_connect", matches!(result, RetryResult::Success(_)));

            let store = Arc::new(result.into_result()?);
            store.apply_schema().await?;
            tracing::info!("✅ Connected to PostgreSQL");

            Ok((store.clone(), store.clone(), store))
        }
    }
}
