//! Request handler module
//!
//! Routes requests to the admin handlers or to static file serving.

pub mod admin;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
