// Server module entry point
// Listener setup, accept loop, connection serving and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::create_listener;
pub use server_loop::Server;
pub use signal::{start_signal_handler, SignalHandler};
