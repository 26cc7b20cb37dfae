//! Application routes.

use crate::config::ServerConfig;
use crate::middleware::install;
use axum::routing::get;
use axum::Router;
use tower_http::normalize_path::NormalizePath;

/// Routes served by every application.
///
/// - `GET /health` - Liveness check
pub fn create_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// The router with the configured middleware installed.
pub fn create_app(config: &ServerConfig) -> NormalizePath<Router> {
    install(create_router(), config)
}

async fn health_check() -> &'static str {
    "ok"
}
