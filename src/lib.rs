pub mod api; // HTTP API: router, middleware, server lifecycle
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod db;
pub mod funnel; // i1–i5 calculator and simulator
pub mod snapshot; // Load/save flows

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run the funnel service until Ctrl-C.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(core_state::CoreState::new());
    tracing::info!(db_path = %core.db_path.display(), "Using funnel database");

    // Fail fast on an unusable data directory or schema
    core.open_db().map_err(|e| format!("Cannot open funnel database: {e}"))?;

    let server = api::server::start_api_server_on(core, config::bind_addr()).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Cannot listen for shutdown signal: {e}"))?;

    server.stop().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
