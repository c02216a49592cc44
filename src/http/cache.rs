//! HTTP cache control module
//!
//! Computes the caching headers of every response from the route kind and
//! the category of the served file, plus conditional request handling.

use chrono::{DateTime, Duration, Utc};
use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::routing::RouteKind;

const HOUR: u32 = 3600;
const WEEK: u32 = 7 * 24 * HOUR;
const MONTH: u32 = 30 * 24 * HOUR;

/// Cache category of a requested resource, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    Image,
    /// Stylesheets and scripts
    Static,
    Html,
    Font,
    Other,
}

impl CacheCategory {
    pub fn from_extension(extension: Option<&str>) -> Self {
        let Some(ext) = extension else {
            return Self::Other;
        };
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" | "avif" | "bmp" => {
                Self::Image
            }
            "css" | "js" | "mjs" => Self::Static,
            "html" | "htm" => Self::Html,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => Self::Font,
            _ => Self::Other,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(path.extension().and_then(|e| e.to_str()))
    }
}

/// Cache-Control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never cache: admin pages and the site index
    NoStore,
    /// Shared cache for `max_age` seconds
    Public { max_age: u32, immutable: bool },
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::NoStore => "no-cache, no-store, must-revalidate".to_string(),
            Self::Public {
                max_age,
                immutable: true,
            } => format!("public, max-age={max_age}, immutable"),
            Self::Public {
                max_age,
                immutable: false,
            } => format!("public, max-age={max_age}"),
        }
    }

    /// Value of the `Expires` header for a response produced at `now`
    pub fn expires(self, now: DateTime<Utc>) -> String {
        match self {
            Self::NoStore => "0".to_string(),
            Self::Public { max_age, .. } => {
                http_date(now + Duration::seconds(i64::from(max_age)))
            }
        }
    }
}

/// Modification time and size of a file on disk, used for validators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    /// Seconds since the Unix epoch
    pub mtime: i64,
    pub size: u64,
}

impl FileStamp {
    /// `None` when the platform cannot report a modification time
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let modified = meta.modified().ok()?;
        let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
        Some(Self {
            mtime: i64::try_from(secs).ok()?,
            size: meta.len(),
        })
    }

    /// Quoted `ETag`, e.g. `"1700000000-5120"`
    pub fn etag(&self) -> String {
        format!("\"{}-{}\"", self.mtime, self.size)
    }

    pub fn last_modified(&self) -> Option<String> {
        DateTime::from_timestamp(self.mtime, 0).map(http_date)
    }
}

/// Ordered set of caching headers for one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheHeaders(Vec<(&'static str, String)>);

impl CacheHeaders {
    fn push(&mut self, name: &'static str, value: String) {
        self.0.push((name, value));
    }

    /// Value of a header, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn etag(&self) -> Option<&str> {
        self.get("ETag")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }
}

/// Headers for responses that must never be cached
pub fn no_store_headers() -> CacheHeaders {
    let mut headers = CacheHeaders::default();
    headers.push("Cache-Control", CachePolicy::NoStore.to_header_value());
    headers.push("Pragma", "no-cache".to_string());
    headers.push("Expires", "0".to_string());
    headers
}

/// Compute the caching headers of a response.
///
/// Precedence: admin route, then the site index (`/` or an index document),
/// then the file category. `stamp` is only consulted for images and is
/// `None` when the file could not be stat'ed.
pub fn cache_headers(
    route: RouteKind,
    is_index: bool,
    category: CacheCategory,
    stamp: Option<&FileStamp>,
    now: DateTime<Utc>,
) -> CacheHeaders {
    if route.is_admin() || route == RouteKind::Root || is_index {
        return no_store_headers();
    }

    let (policy, vary) = match category {
        CacheCategory::Image | CacheCategory::Font => (
            CachePolicy::Public {
                max_age: MONTH,
                immutable: true,
            },
            false,
        ),
        CacheCategory::Static => (
            CachePolicy::Public {
                max_age: WEEK,
                immutable: false,
            },
            true,
        ),
        CacheCategory::Html => (
            CachePolicy::Public {
                max_age: HOUR,
                immutable: false,
            },
            true,
        ),
        CacheCategory::Other => (
            CachePolicy::Public {
                max_age: HOUR,
                immutable: false,
            },
            false,
        ),
    };

    let mut headers = CacheHeaders::default();
    headers.push("Cache-Control", policy.to_header_value());
    headers.push("Expires", policy.expires(now));
    if vary {
        headers.push("Vary", "Accept-Encoding".to_string());
    }
    if category == CacheCategory::Image {
        if let Some(stamp) = stamp {
            headers.push("ETag", stamp.etag());
            if let Some(last_modified) = stamp.last_modified() {
                headers.push("Last-Modified", last_modified);
            }
        }
    }
    headers
}

/// Format a timestamp as an HTTP date (RFC 7231 IMF-fixdate)
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
