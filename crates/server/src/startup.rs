use std::path::Path;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::{runtime, storage::JsonFileStore};

/// Any origin may call the API, as with a bare `cors()` middleware.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire config, storage and routes into a ready-to-serve router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.storage.public_dir, &cfg.storage.data_file).await?;
    let store = JsonFileStore::init_with_seed(&cfg.storage.data_file).await?;
    let state = AppState::new(store);
    Ok(routes::build_router(state, build_cors(), Path::new(&cfg.storage.public_dir)))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate()?;
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind(cfg.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, data_file = %cfg.storage.data_file, "announcements server running");
    axum::serve(listener, app).await?;
    Ok(())
}
