// Configuration module
// Server settings passed explicitly to the server constructor

mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ServerError;

pub use state::AppState;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Title printed in the startup banner
pub const BANNER_TITLE: &str = "JSON-LD Matching System Server";

/// Server configuration
///
/// Every value has a fixed default; nothing is read from files or the
/// environment. Tests and embedders override fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen host, `0.0.0.0` binds all interfaces
    pub host: String,
    /// Listen port, `0` picks an ephemeral port
    pub port: u16,
    /// Document root that request paths resolve against
    pub root: PathBuf,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Tokio worker threads (CPU cores when unset)
    pub workers: Option<usize>,
    /// Emit one access log line per request
    pub access_log: bool,
    /// `tracing` filter directive, e.g. `info` or `cors_static_server=debug`
    pub log_level: String,
    /// Value of the `Server` response header
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: default_root(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            workers: None,
            access_log: true,
            log_level: "info".to_string(),
            server_name: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// The directory holding the running executable, so a copied or moved
/// binary serves the files placed next to it
///
/// Falls back to the working directory when the executable path is unknown.
fn default_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl ServerConfig {
    /// Default configuration serving `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{addr}: {e}")))
    }

    /// Canonical document root, rejected if missing or not a directory
    pub fn canonical_root(&self) -> Result<PathBuf, ServerError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ServerError::DocumentRoot(self.root.clone(), e.to_string()))?;
        if !root.is_dir() {
            return Err(ServerError::DocumentRoot(
                self.root.clone(),
                "not a directory".to_string(),
            ));
        }
        Ok(root)
    }
}
