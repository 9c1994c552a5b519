//! Static file server that adds CORS and no-cache headers to every response.
//!
//! Configuration is an explicit [`config::ServerConfig`] handed to
//! [`server::Server::bind`]; see `main.rs` for the fixed defaults.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
