//! Logger module
//!
//! Thin facade over `tracing`:
//! - Subscriber setup from the configured filter directive
//! - Server lifecycle logging
//! - Access logging in Common Log Format
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::ServerConfig;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber
///
/// Should be called once at application startup. Log lines go to stderr so
/// stdout carries only the banner and the shutdown message. An invalid
/// directive falls back to `info`; a second call is a no-op.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &ServerConfig) {
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Document root: {}", root.display());
    if let Some(workers) = config.workers {
        tracing::info!("Worker threads: {workers}");
    }
}

pub fn log_server_stopped() {
    tracing::info!("Server stopped");
}

/// Log one request in Common Log Format
pub fn log_access(entry: &AccessLogEntry) {
    tracing::info!(target: "access", "{}", entry.format_common());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("{signal} received, shutting down");
}
