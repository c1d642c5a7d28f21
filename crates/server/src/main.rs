//! Capacity planner service
//!
//! Serves the planning engine and named scenarios over HTTP.

use anyhow::Result;
use capacity_planner::{api, ServerConfig};
use planner_lib::{
    observability::{PlannerMetrics, StructuredLogger},
    scenario::SqliteScenarioStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const PLANNER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting capacity-planner");

    let config = ServerConfig::load()?;
    info!(
        instance = %config.instance_name,
        database_url = %config.database_url,
        "Planner configured"
    );

    let store = SqliteScenarioStore::connect(&config.database_url, config.max_connections).await?;

    let metrics = PlannerMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(PLANNER_VERSION, &config.listen_addr(), &config.database_url);

    let app_state = Arc::new(api::AppState::new(
        Arc::new(store.clone()),
        metrics,
        logger.clone(),
        config.scenario_list_limit,
    ));

    api::serve(&config.listen_addr(), app_state, shutdown_signal()).await?;

    logger.log_shutdown("SIGINT received");
    store.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
