use std::path::Path;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod announcements;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public API, admin API and static pages.
pub fn build_router(state: AppState, cors: CorsLayer, public_dir: &Path) -> Router {
    // Static pages; anything else unmatched is looked up under `public_dir`
    let landing = ServeFile::new(public_dir.join("index.html"));
    let admin_page = ServeFile::new(public_dir.join("admin.html"));
    let assets = ServeDir::new(public_dir);

    let public = Router::new()
        .route("/health", get(health))
        .route("/api/announcements", get(announcements::list_public));

    let admin_routes = Router::new()
        .route(
            "/api/admin/announcements",
            get(announcements::list_all).post(announcements::create),
        )
        .route(
            "/api/admin/announcements/:id",
            get(announcements::get_one)
                .put(announcements::update)
                .delete(announcements::delete),
        );

    public
        .merge(admin_routes)
        .route_service("/", landing)
        .route_service("/admin", admin_page)
        .fallback_service(assets)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
