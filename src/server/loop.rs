// Server loop module
// Accepts connections until a shutdown notification arrives

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::handle_connection;
use super::listener::create_listener;
use crate::config::{AppState, ServerConfig};
use crate::error::{Result, ServerError};
use crate::logger;

/// A bound, not yet running, static file server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Validate `config` and bind its address
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let addr = config.get_socket_addr()?;
        let state = AppState::new(config)?;
        let listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Actual bound address (resolves port `0`)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Notify handle that stops `run` when signalled
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Accept connections until shutdown is notified
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run(self) -> Result<()> {
        let Self {
            listener,
            state,
            shutdown,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            logger::log_server_start(&addr, &state.root, &state.config);
        }

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            handle_connection(stream, peer_addr, Arc::clone(&state));
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = shutdown.notified() => {
                    logger::log_server_stopped();
                    return Ok(());
                }
            }
        }
    }
}
