//! Session cookie parsing and `Set-Cookie` values

/// Name of the admin session cookie
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Extract a cookie value by name from a `Cookie` request header.
///
/// Pairs are `;`-separated, whitespace around each pair is ignored and the
/// value is everything after the first `=`.
pub fn find_cookie<'a>(cookie_header: Option<&'a str>, name: &str) -> Option<&'a str> {
    cookie_header?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value that installs a session token
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict")
}

/// `Set-Cookie` value that clears the session cookie
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
}
