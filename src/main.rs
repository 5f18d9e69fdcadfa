use anyhow::Context;
use axum::{Router, routing::get};
use nifty_dashboard_api::dataset::SharedDataset;
use nifty_dashboard_api::{api, config, loader};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    tracing::info!("Starting nifty-dashboard-api");
    tracing::info!(
        environment = %app_config.environment,
        port = app_config.port,
        data_file = %app_config.data_file,
        sma_grouping = app_config.sma_grouping.as_str(),
        "Loaded configuration"
    );

    // One-shot load; the dataset is immutable for the rest of the session.
    let dataset = loader::load(&app_config.data_file, app_config.sma_grouping)
        .with_context(|| format!("failed to load dataset from {}", app_config.data_file))?;
    let shared: SharedDataset = Arc::new(dataset);

    let app = Router::new()
        .route("/health", get(api::health_handler))
        .route("/categories", get(api::list_categories_handler))
        .route("/stocks", get(api::list_stocks_handler))
        .route("/series", get(api::get_series_handler))
        .route("/summary", get(api::dataset_summary_handler))
        .layer(CorsLayer::permissive())
        .with_state(shared);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    tracing::info!(%addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
