//! Middleware stack for the application router.
//!
//! Units are listed outermost first. Slash stripping has to see the request
//! before routing, so it wraps the router itself rather than being a router
//! layer.

use crate::config::ServerConfig;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Value of the `Expires` header sent by [`Middleware::NoCache`].
pub const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 UTC";

const NO_CACHE_HEADERS: [(&str, &str); 4] = [
    ("expires", EPOCH),
    (
        "cache-control",
        "no-cache, no-store, no-transform, must-revalidate, private, max-age=0",
    ),
    ("pragma", "no-cache"),
    ("x-accel-expires", "0"),
];

/// A request-handling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Middleware {
    /// Remove trailing slashes from request paths.
    StripSlashes,
    /// Log every request and response.
    RequestLogging,
    /// Turn handler panics into `500` responses.
    PanicRecovery,
    /// Send headers that disable client and proxy caching.
    NoCache,
    /// Allow cross-origin requests.
    Cors,
}

/// Ordered middleware for a configuration, outermost first.
#[must_use]
pub fn middleware_stack(config: &ServerConfig) -> Vec<Middleware> {
    let mut stack = vec![
        Middleware::StripSlashes,
        Middleware::RequestLogging,
        Middleware::PanicRecovery,
    ];
    if config.assets_no_cache {
        stack.push(Middleware::NoCache);
    }
    if config.cors {
        stack.push(Middleware::Cors);
    }
    stack
}

/// Apply the middleware stack to a router.
pub fn install(router: Router, config: &ServerConfig) -> NormalizePath<Router> {
    let stack = middleware_stack(config);
    debug!(?stack, "Installing middleware");

    // Router::layer wraps everything added so far, so apply innermost first.
    let router = stack.iter().rev().fold(router, |router, unit| match unit {
        Middleware::StripSlashes => router,
        Middleware::RequestLogging => router.layer(TraceLayer::new_for_http()),
        Middleware::PanicRecovery => router.layer(CatchPanicLayer::new()),
        Middleware::NoCache => no_cache(router),
        Middleware::Cors => router.layer(CorsLayer::permissive()),
    });

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn no_cache(router: Router) -> Router {
    NO_CACHE_HEADERS
        .iter()
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}
