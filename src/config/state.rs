// Application state module
// Read-only state shared by every connection

use std::path::PathBuf;

use super::ServerConfig;
use crate::error::ServerError;

/// Application state
pub struct AppState {
    pub config: ServerConfig,
    /// Canonical document root, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState`, failing if the document root is unusable
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let root = config.canonical_root()?;
        Ok(Self { config, root })
    }
}
