// Signal handling module
//
// Supported signals:
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGTERM: Graceful shutdown (Unix only)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::error::ServerError;
use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal, shared with the accept loop
    pub shutdown: Arc<Notify>,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self {
            shutdown,
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Record the request and wake the accept loop
    ///
    /// `notify_one` stores a permit, so a loop that is between polls still
    /// sees the signal.
    pub fn request_shutdown(&self, signal: &str) {
        logger::log_shutdown_requested(signal);
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

/// Start signal handlers (Unix)
///
/// Registration happens before returning so failures surface at startup;
/// waiting happens on a background task.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> Result<(), ServerError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).map_err(ServerError::Signal)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(ServerError::Signal)?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => handler.request_shutdown("SIGINT"),
            _ = sigterm.recv() => handler.request_shutdown("SIGTERM"),
        }
    });
    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> Result<(), ServerError> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => handler.request_shutdown("Ctrl+C"),
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
    Ok(())
}
