//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! file-serving logic in `handler`.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use headers::{inject_default_headers, set_server_header};
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_416_response, build_error_response, build_redirect_response,
};
