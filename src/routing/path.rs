//! Request path normalization
//!
//! Routing and file lookup both work on the normalized form, so every
//! spelling of a location (`/%61dmin/`, `//admin/`, `/x/../admin/`) is
//! classified the same way.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a normalized path is put back into a header
const PATH_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-decode a request path and resolve its segments.
///
/// Empty and `.` segments are dropped, `..` removes the previous segment and
/// never climbs above `/`. A trailing slash is kept. Returns `None` for paths
/// that do not decode to UTF-8 or that contain NUL.
pub fn normalize_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    let last = decoded.rsplit('/').next().unwrap_or_default();
    let trailing_slash = matches!(last, "" | "." | "..");

    let mut path = String::with_capacity(decoded.len());
    for segment in &segments {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() || trailing_slash {
        path.push('/');
    }
    Some(path)
}

/// Percent-encode a normalized path for use in a `Location` header
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPES).to_string()
}
