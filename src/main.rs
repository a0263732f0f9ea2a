//! Service entry point: config, database, router, graceful shutdown.

use pr_service::api::{self, AppState};
use pr_service::config::Config;
use pr_service::db;
use pr_service::services::AssignmentEngine;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match db::initialize(&config.db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("failed to initialize database at {:?}: {e}", config.db_path);
            std::process::exit(1);
        }
    };

    let state = AppState {
        db: pool.clone(),
        engine: Arc::new(AssignmentEngine::new(pool)),
    };

    let app = api::router(state);

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("failed to bind to {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };

    log::info!("listening on http://{}", config.listen_addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for shutdown signal: {e}");
        }
        log::info!("shutting down");
    });

    if let Err(e) = server.await {
        log::error!("server error: {e}");
        std::process::exit(1);
    }
}
