//! Request handler module
//!
//! Responsible for request dispatch and static file serving: path
//! translation, index files, directory listings and conditional/range
//! responses.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
