//! HTTP response building module
//!
//! Provides builders for the status codes the server emits. Every builder
//! attaches a complete set of caching headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::Response;

use super::cache::{no_store_headers, CacheHeaders};

pub type HttpResponse = Response<Full<Bytes>>;

/// Build 200 response for a file or rendered document
pub fn build_ok_response(
    data: Bytes,
    content_type: &str,
    cache: &CacheHeaders,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    with_cache_headers(Response::builder(), cache)
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, cache: &CacheHeaders, is_head: bool) -> HttpResponse {
    build_ok_response(
        Bytes::from(content),
        "text/html; charset=utf-8",
        cache,
        is_head,
    )
}

/// Build 304 Not Modified response
pub fn build_304_response(cache: &CacheHeaders) -> HttpResponse {
    with_cache_headers(Response::builder(), cache)
        .status(304)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 redirect response, optionally setting a cookie
pub fn build_redirect_response(target: &str, set_cookie: Option<&str>) -> HttpResponse {
    let mut builder = with_cache_headers(Response::builder(), &no_store_headers())
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain");
    if let Some(cookie) = set_cookie {
        builder = builder.header("Set-Cookie", cookie);
    }

    builder
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build 301 response sending a directory request to its slash-terminated form
pub fn build_moved_permanently_response(target: &str) -> HttpResponse {
    with_cache_headers(Response::builder(), &no_store_headers())
        .status(301)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::from("Moved Permanently")))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> HttpResponse {
    build_plain_error(400, "400 Bad Request", None)
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_plain_error(404, "404 Not Found", None)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> HttpResponse {
    build_plain_error(405, "405 Method Not Allowed", Some(allow))
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    build_plain_error(413, "413 Payload Too Large", None)
}

/// Build 500 Internal Server Error response carrying `message`
pub fn build_500_response(message: &str) -> HttpResponse {
    build_plain_error(500, &format!("500 Internal Server Error: {message}"), None)
}

fn build_plain_error(status: u16, body: &str, allow: Option<&str>) -> HttpResponse {
    let mut builder = with_cache_headers(Response::builder(), &no_store_headers())
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    if let Some(allow) = allow {
        builder = builder.header("Allow", allow);
    }

    builder
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from(body.to_string())))
        })
}

fn with_cache_headers(builder: Builder, cache: &CacheHeaders) -> Builder {
    cache
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value))
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
