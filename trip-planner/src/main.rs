use std::process::ExitCode;

use tracing::{error, info, warn};

use trip_planner::cache::LegCache;
use trip_planner::config::AppConfig;
use trip_planner::legs::load_from_cache;
use trip_planner::logging;
use trip_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Build the initial snapshot from whatever is cached
    let cache = LegCache::new(config.cache_config());
    let ingestion = match load_from_cache(&cache) {
        Ok(ingestion) => ingestion,
        Err(e) => {
            error!("Failed to load leg cache: {e}");
            return ExitCode::FAILURE;
        }
    };
    if !ingestion.rejected.is_empty() {
        warn!(
            rejected = ingestion.rejected.len(),
            "Some cached legs were invalid and skipped"
        );
    }
    info!(
        legs = ingestion.store.len(),
        dir = %cache.dir().display(),
        "Loaded leg store"
    );

    let state = AppState::new(ingestion.store, cache, config.search.clone());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.server.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind = %config.server.bind, "Failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Trip planner listening on http://{}", config.server.bind);
    info!("  GET  /health       - Health check");
    info!("  GET  /legs         - Known legs (?origin=XXX)");
    info!("  POST /legs/reload  - Rescan the fare cache");
    info!("  POST /trip/plan    - Plan the cheapest trip");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
