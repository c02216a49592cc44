//! HTTP protocol layer module
//!
//! Caching policy, MIME detection and response builders, decoupled from the
//! routing and authentication decisions made in `handler`.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::{cache_headers, CacheCategory, CacheHeaders, FileStamp};
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_moved_permanently_response,
    build_ok_response, build_redirect_response, HttpResponse,
};
