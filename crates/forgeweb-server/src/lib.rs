//! # Forgeweb Server
//!
//! HTTP server for forgeweb applications.
//!
//! This crate provides:
//! - Server settings read from `config/config.toml`
//! - The ordered middleware stack (slash stripping, request logging, panic
//!   recovery, optional no-cache headers and CORS)
//! - A health endpoint and a server runner with graceful shutdown

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use middleware::{install, middleware_stack, Middleware};
pub use routes::{create_app, create_router};
pub use server::{serve, shutdown_signal};
