//! Static file serving module
//!
//! Resolves request paths inside the document root, loads files and builds
//! responses carrying the caching headers of `http::cache`.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, CacheCategory, FileStamp};
use crate::logger;
use crate::routing::{encode_path, RouteKind};
use chrono::Utc;
use hyper::body::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where a request path points inside the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A regular file, canonical path
    File(PathBuf),
    /// A directory addressed without its trailing slash; redirect to this path
    AddSlash(String),
    /// Missing, undecodable, or outside the document root
    NotFound,
}

/// Map a normalized request path (see `routing::normalize_path`) to a file
/// under `root`.
///
/// The path is joined to the root and canonicalized; any result that does
/// not stay inside the canonical root is rejected, so symlinks cannot escape
/// it. Directories resolve to their `index_file`.
pub fn resolve(root: &Path, request_path: &str, index_file: &str) -> Resolved {
    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Resolved::NotFound;
        }
    };

    let relative = request_path.trim_start_matches('/');
    // File not found is common (404), no need to log at warning level
    let Ok(candidate) = root_canonical.join(relative).canonicalize() else {
        return Resolved::NotFound;
    };
    if !candidate.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            candidate.display()
        ));
        return Resolved::NotFound;
    }

    if candidate.is_dir() {
        if !request_path.ends_with('/') {
            return Resolved::AddSlash(encode_path(&format!("{request_path}/")));
        }
        let index = candidate.join(index_file);
        return if index.is_file() {
            Resolved::File(index)
        } else {
            Resolved::NotFound
        };
    }

    Resolved::File(candidate)
}

/// Whether a normalized request path lands inside the `dir` subdirectory of
/// `root` once symlinks are followed
pub fn resolves_into(root: &Path, request_path: &str, dir: &str) -> bool {
    let Ok(root_canonical) = root.canonicalize() else {
        return false;
    };
    let Ok(protected) = root_canonical.join(dir).canonicalize() else {
        return false;
    };
    root_canonical
        .join(request_path.trim_start_matches('/'))
        .canonicalize()
        .is_ok_and(|candidate| candidate.starts_with(&protected))
}

/// Serve the request path from the document root
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    root: &Path,
    request_path: &str,
    route: RouteKind,
    index_file: &str,
) -> http::HttpResponse {
    match resolve(root, request_path, index_file) {
        Resolved::File(path) => serve_file(ctx, &path, route, index_file).await,
        Resolved::AddSlash(target) => http::build_moved_permanently_response(&target),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Serve a single resolved file with headers from the cache policy
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    route: RouteKind,
    index_file: &str,
) -> http::HttpResponse {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_500_response(&e.to_string());
        }
    };

    let category = CacheCategory::from_path(path);
    // Validators are only emitted for images; a failed stat just drops them
    let stamp = if category == CacheCategory::Image {
        fs::metadata(path)
            .await
            .ok()
            .and_then(|meta| FileStamp::from_metadata(&meta))
    } else {
        None
    };
    let is_index = path
        .file_name()
        .is_some_and(|name| name.to_str() == Some(index_file));

    let headers = cache::cache_headers(route, is_index, category, stamp.as_ref(), Utc::now());

    // Check if client has cached version
    if let Some(etag) = headers.etag() {
        if cache::check_etag_match(ctx.if_none_match, etag) {
            return http::build_304_response(&headers);
        }
    }

    http::build_ok_response(
        Bytes::from(content),
        mime::content_type_for(path),
        &headers,
        ctx.is_head,
    )
}

/// Render the admin document directly, with admin (no-store) caching.
///
/// A missing document is a 404; any other failure is a 500 carrying the error.
pub async fn serve_admin_document(
    ctx: &RequestContext<'_>,
    root: &Path,
    admin_document: &str,
) -> http::HttpResponse {
    let path = root.join(admin_document);
    match fs::read(&path).await {
        Ok(content) => http::build_ok_response(
            Bytes::from(content),
            mime::content_type_for(&path),
            &cache::no_store_headers(),
            ctx.is_head,
        ),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            logger::log_warning(&format!("Admin document not found: {}", path.display()));
            http::build_404_response()
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read admin document '{}': {e}",
                path.display()
            ));
            http::build_500_response(&e.to_string())
        }
    }
}
