use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the server from starting or running
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Document root {} is unusable: {}", .0.display(), .1)]
    DocumentRoot(PathBuf, String),

    #[error("Failed to register signal handler: {0}")]
    Signal(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
