//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body-size validation, route
//! classification and an exhaustive dispatch over method × route.

use crate::config::AppState;
use crate::handler::{admin, static_files};
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{normalize_path, RouteKind, ADMIN_PREFIX};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, COOKIE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub peer: SocketAddr,
}

/// Method classes the router distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    /// GET and HEAD
    Read,
    Post,
    Other,
}

impl Verb {
    fn of(method: &Method) -> Self {
        match *method {
            Method::GET | Method::HEAD => Self::Read,
            Method::POST => Self::Post,
            _ => Self::Other,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    // Every spelling of a location is routed (and gated) as its normal form
    let normalized = normalize_path(parts.uri.path());
    let route = normalized
        .as_deref()
        .map(|path| classify_location(&state, path));

    let ctx = RequestContext {
        path: normalized.as_deref().unwrap_or("/"),
        query: parts.uri.query(),
        is_head: parts.method == Method::HEAD,
        if_none_match: header_str(&parts.headers, IF_NONE_MATCH.as_str()),
        cookie: header_str(&parts.headers, COOKIE.as_str()),
        peer,
    };

    let mut response = match (check_body_size(&parts.headers, state.config.http.max_body_size), route) {
        (Some(resp), _) => resp,
        (None, Some(route)) => dispatch(Verb::of(&parts.method), route, &ctx, body, &state).await,
        (None, None) => {
            logger::log_warning(&format!("Undecodable request path: {}", parts.uri.path()));
            http::build_400_response()
        }
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(
            peer.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_str(&parts.headers, REFERER.as_str()).map(ToString::to_string);
        entry.user_agent = header_str(&parts.headers, USER_AGENT.as_str()).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Classify a normalized path. A static path that reaches the admin
/// directory through a symlink is still an admin route.
fn classify_location(state: &AppState, path: &str) -> RouteKind {
    let route = RouteKind::classify(path);
    if route == RouteKind::StaticFile
        && static_files::resolves_into(
            &state.document_root,
            path,
            ADMIN_PREFIX.trim_start_matches('/'),
        )
    {
        return RouteKind::AdminOther;
    }
    route
}

/// One arm per (method, route) pair
async fn dispatch<B>(
    verb: Verb,
    route: RouteKind,
    ctx: &RequestContext<'_>,
    body: B,
    state: &AppState,
) -> HttpResponse
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let site = &state.config.site;
    match (verb, route) {
        (Verb::Read, RouteKind::Root) => {
            static_files::serve_path(ctx, &state.document_root, "/", route, &site.index_file).await
        }
        (Verb::Read, RouteKind::StaticFile) => {
            static_files::serve_path(ctx, &state.document_root, ctx.path, route, &site.index_file)
                .await
        }
        (Verb::Read, RouteKind::AdminLogin) => admin::serve_login_page(ctx),
        (Verb::Read, RouteKind::AdminLogout) => admin::logout(ctx, state),
        (Verb::Read, RouteKind::AdminOther) => admin::serve_protected(ctx, state).await,
        (Verb::Post, RouteKind::AdminLogin) => {
            match read_body(body, state.config.http.max_body_size).await {
                Ok(bytes) => admin::login(ctx, state, &bytes).await,
                Err(resp) => resp,
            }
        }
        (Verb::Other, RouteKind::AdminLogin) => {
            logger::log_warning(&format!("Method not allowed on {}", ctx.path));
            http::build_405_response("GET, HEAD, POST")
        }
        (
            Verb::Post | Verb::Other,
            RouteKind::Root | RouteKind::StaticFile | RouteKind::AdminLogout | RouteKind::AdminOther,
        ) => {
            logger::log_warning(&format!("Method not allowed on {}", ctx.path));
            http::build_405_response("GET, HEAD")
        }
    }
}

/// Collect a request body, refusing anything beyond `max_body_size`
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, HttpResponse>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Request body too large (max: {max_body_size} bytes)"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthPolicy, Config};
    use http_body_util::Full;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const PASSWORD: &str = "trumpet";

    struct Site {
        // Keeps the directory alive for the duration of the test
        _dir: TempDir,
        state: Arc<AppState>,
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn site_with(policy: AuthPolicy, password: Option<&str>, tweak: impl FnOnce(&mut Config)) -> Site {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "secret.txt", b"outside the root");

        let root = dir.path().join("site");
        write(&root, "index.html", b"<h1>Blog</h1>");
        write(&root, "style.css", b"body { color: gold; }");
        write(&root, "app.js", b"console.log(1);");
        write(&root, "logo.png", &[0x89, b'P', b'N', b'G']);
        write(&root, "fonts/serif.woff2", b"wOF2");
        write(&root, "about.html", b"<p>About</p>");
        write(&root, "notes.txt", b"notes");
        write(&root, "administrator.html", b"<p>not admin</p>");
        write(&root, "admin/index.html", b"<h1>Admin panel</h1>");
        write(&root, "admin/stats.json", b"{\"posts\":3}");

        let mut cfg = Config::defaults().unwrap();
        cfg.site.root = root.to_string_lossy().into_owned();
        cfg.admin.auth_policy = policy;
        cfg.logging.access_log = false;
        tweak(&mut cfg);

        let state = Arc::new(AppState::new(&cfg, password.map(ToString::to_string)));
        Site { _dir: dir, state }
    }

    fn session_site() -> Site {
        site_with(AuthPolicy::Session, Some(PASSWORD), |_| {})
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    async fn send(
        site: &Site,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> HttpResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Full::new(Bytes::from(body.to_string()))).unwrap();
        handle_request(req, Arc::clone(&site.state), peer())
            .await
            .unwrap()
    }

    async fn get(site: &Site, uri: &str) -> HttpResponse {
        send(site, Method::GET, uri, &[], "").await
    }

    async fn get_with_cookie(site: &Site, uri: &str, cookie: &str) -> HttpResponse {
        send(site, Method::GET, uri, &[("Cookie", cookie)], "").await
    }

    async fn post_login(site: &Site, form: &str) -> HttpResponse {
        send(
            site,
            Method::POST,
            "/admin/login",
            &[("Content-Type", "application/x-www-form-urlencoded")],
            form,
        )
        .await
    }

    fn header<'a>(resp: &'a HttpResponse, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    async fn body_text(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_no_store(resp: &HttpResponse) {
        assert_eq!(
            header(resp, "Cache-Control"),
            Some("no-cache, no-store, must-revalidate")
        );
        assert_eq!(header(resp, "Pragma"), Some("no-cache"));
        assert_eq!(header(resp, "Expires"), Some("0"));
    }

    /// Log in under the session policy and return the `Cookie` header to replay
    async fn login_cookie(site: &Site) -> String {
        let resp = post_login(site, &format!("password={PASSWORD}")).await;
        assert_eq!(resp.status(), 302);
        let set_cookie = header(&resp, "Set-Cookie").unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_root_serves_index_without_caching() {
        let site = session_site();
        let resp = get(&site, "/").await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);
        assert_eq!(header(&resp, "Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(header(&resp, "Server"), Some("blog_server"));
        assert_eq!(body_text(resp).await, "<h1>Blog</h1>");

        let resp = get(&site, "/index.html").await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);
    }

    #[tokio::test]
    async fn test_stylesheet_headers() {
        let site = session_site();
        let resp = get(&site, "/style.css").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=604800"));
        assert_eq!(header(&resp, "Vary"), Some("Accept-Encoding"));
        assert!(header(&resp, "Pragma").is_none());
        assert!(header(&resp, "Expires").unwrap().ends_with(" GMT"));
        assert!(header(&resp, "ETag").is_none());

        let resp = get(&site, "/app.js").await;
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=604800"));
        assert_eq!(header(&resp, "Vary"), Some("Accept-Encoding"));
    }

    #[tokio::test]
    async fn test_image_headers_and_conditional_get() {
        let site = session_site();
        let resp = get(&site, "/logo.png").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            header(&resp, "Cache-Control"),
            Some("public, max-age=2592000, immutable")
        );
        assert!(header(&resp, "Last-Modified").unwrap().ends_with(" GMT"));
        assert!(header(&resp, "Vary").is_none());
        assert!(header(&resp, "Pragma").is_none());

        let etag = header(&resp, "ETag").unwrap().to_string();
        let inner = etag.trim_matches('"');
        let (mtime, size) = inner.split_once('-').unwrap();
        assert!(mtime.parse::<i64>().is_ok());
        assert_eq!(size, "4");

        let resp = send(&site, Method::GET, "/logo.png", &[("If-None-Match", etag.as_str())], "").await;
        assert_eq!(resp.status(), 304);
        assert_eq!(header(&resp, "ETag"), Some(etag.as_str()));
        assert!(body_text(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_font_html_and_other_headers() {
        let site = session_site();

        let resp = get(&site, "/fonts/serif.woff2").await;
        assert_eq!(
            header(&resp, "Cache-Control"),
            Some("public, max-age=2592000, immutable")
        );
        assert!(header(&resp, "ETag").is_none());
        assert!(header(&resp, "Vary").is_none());

        let resp = get(&site, "/about.html").await;
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=3600"));
        assert_eq!(header(&resp, "Vary"), Some("Accept-Encoding"));
        assert!(header(&resp, "Pragma").is_none());

        let resp = get(&site, "/notes.txt").await;
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=3600"));
        assert!(header(&resp, "Vary").is_none());
        assert!(header(&resp, "Pragma").is_none());
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let site = session_site();
        let resp = send(&site, Method::HEAD, "/style.css", &[], "").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "Content-Length"), Some("21"));
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=604800"));
        assert!(body_text(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let site = session_site();
        assert_eq!(get(&site, "/nope.html").await.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_never_escapes_root() {
        let site = session_site();
        for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/fonts/../../secret.txt"] {
            let resp = get(&site, uri).await;
            assert_eq!(resp.status(), 404, "{uri}");
            assert!(!body_text(resp).await.contains("outside the root"));
        }
        assert_eq!(get(&site, "/fonts/../style.css").await.status(), 200);
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let site = session_site();
        let resp = get(&site, "/fonts").await;
        assert_eq!(resp.status(), 301);
        assert_eq!(header(&resp, "Location"), Some("/fonts/"));
    }

    #[tokio::test]
    async fn test_admin_requires_login() {
        let site = session_site();
        for uri in ["/admin", "/admin/", "/admin/stats.json", "/admin/missing.html"] {
            let resp = get(&site, uri).await;
            assert_eq!(resp.status(), 302, "{uri}");
            assert_eq!(header(&resp, "Location"), Some("/admin/login"));
            assert_no_store(&resp);
        }
        let resp = get_with_cookie(&site, "/admin/", "admin_session=forged").await;
        assert_eq!(resp.status(), 302);
    }

    #[tokio::test]
    async fn test_admin_prefix_is_a_path_segment() {
        let site = session_site();
        let resp = get(&site, "/administrator.html").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "Cache-Control"), Some("public, max-age=3600"));
    }

    const ADMIN_SPELLINGS: [&str; 6] = [
        "/%61dmin/index.html",
        "//admin/index.html",
        "/admin//stats.json",
        "/./admin/stats.json",
        "/fonts/../admin/stats.json",
        "/%2e%2e/admin/index.html",
    ];

    #[tokio::test]
    async fn test_alternate_admin_spellings_are_gated() {
        for policy in [AuthPolicy::Session, AuthPolicy::Reauthenticate] {
            let site = site_with(policy, Some(PASSWORD), |_| {});
            for uri in ADMIN_SPELLINGS {
                let resp = get(&site, uri).await;
                assert_eq!(resp.status(), 302, "{policy} {uri}");
                assert_eq!(header(&resp, "Location"), Some("/admin/login"), "{policy} {uri}");
                assert_no_store(&resp);
                let body = body_text(resp).await;
                assert!(!body.contains("Admin panel") && !body.contains("posts"), "{uri}");
            }
        }
    }

    #[tokio::test]
    async fn test_alternate_admin_spellings_with_session() {
        let site = session_site();
        let cookie = login_cookie(&site).await;
        for uri in ADMIN_SPELLINGS {
            let resp = get_with_cookie(&site, uri, &cookie).await;
            assert_eq!(resp.status(), 200, "{uri}");
            assert_no_store(&resp);
        }
    }

    #[tokio::test]
    async fn test_undecodable_path_is_bad_request() {
        let site = session_site();
        assert_eq!(get(&site, "/%FF").await.status(), 400);
        assert_eq!(get(&site, "/admin/%00").await.status(), 400);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_to_admin_is_gated() {
        let site = session_site();
        let root = site.state.document_root.clone();
        std::os::unix::fs::symlink(root.join("admin"), root.join("mirror")).unwrap();

        let resp = get(&site, "/mirror/stats.json").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login"));

        let cookie = login_cookie(&site).await;
        let resp = get_with_cookie(&site, "/mirror/stats.json", &cookie).await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);
    }

    #[tokio::test]
    async fn test_login_page() {
        let site = session_site();
        let resp = get(&site, "/admin/login").await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);
        let html = body_text(resp).await;
        assert!(html.contains(r#"action="/admin/login""#));
        assert!(!html.contains(r#"class="error-message""#));
    }

    #[tokio::test]
    async fn test_wrong_password_redirects_with_error() {
        let site = session_site();
        let resp = post_login(&site, "password=wrong").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login?error=1"));
        assert!(header(&resp, "Set-Cookie").is_none());
        assert!(site.state.gate.sessions().is_empty());

        let resp = get(&site, "/admin/login?error=1").await;
        assert_eq!(resp.status(), 200);
        assert!(body_text(resp).await.contains(r#"<div class="error-message">"#));
    }

    #[tokio::test]
    async fn test_missing_password_field_is_denied() {
        let site = session_site();
        let resp = post_login(&site, "user=admin").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login?error=1"));
    }

    #[tokio::test]
    async fn test_session_login_grants_access() {
        let site = session_site();
        let resp = post_login(&site, &format!("password={PASSWORD}")).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/"));

        let set_cookie = header(&resp, "Set-Cookie").unwrap();
        assert!(set_cookie.starts_with("admin_session="));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let token = cookie.trim_start_matches("admin_session=");
        assert_eq!(token.len(), 64);
        assert!(site.state.gate.sessions().contains(token));

        let resp = get_with_cookie(&site, "/admin/", &cookie).await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);
        assert_eq!(body_text(resp).await, "<h1>Admin panel</h1>");

        // Admin files keep admin caching whatever their category
        let resp = get_with_cookie(&site, "/admin/stats.json", &format!("theme=dark; {cookie}")).await;
        assert_eq!(resp.status(), 200);
        assert_no_store(&resp);

        let resp = get_with_cookie(&site, "/admin/missing.html", &cookie).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_logout_invalidates_cookie() {
        let site = session_site();
        let cookie = login_cookie(&site).await;
        assert_eq!(get_with_cookie(&site, "/admin/", &cookie).await.status(), 200);

        let resp = get_with_cookie(&site, "/admin/logout", &cookie).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/"));
        assert_eq!(
            header(&resp, "Set-Cookie"),
            Some("admin_session=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
        );
        assert!(site.state.gate.sessions().is_empty());

        let resp = get_with_cookie(&site, "/admin/stats.json", &cookie).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login"));
    }

    #[tokio::test]
    async fn test_logout_without_session_still_redirects() {
        let site = session_site();
        let resp = get(&site, "/admin/logout").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/"));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_evicted() {
        let site = site_with(AuthPolicy::Session, Some(PASSWORD), |cfg| {
            cfg.admin.session_ttl_secs = 1;
        });
        let cookie = login_cookie(&site).await;
        let token = cookie.trim_start_matches("admin_session=").to_string();
        assert!(site.state.gate.sessions().contains(&token));

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let resp = get_with_cookie(&site, "/admin/", &cookie).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login"));
        assert!(!site.state.gate.sessions().contains(&token));
    }

    #[tokio::test]
    async fn test_reauthenticate_renders_admin_directly() {
        let site = site_with(AuthPolicy::Reauthenticate, Some(PASSWORD), |_| {});
        let resp = post_login(&site, &format!("password={PASSWORD}")).await;
        assert_eq!(resp.status(), 200);
        assert!(header(&resp, "Set-Cookie").is_none());
        assert!(header(&resp, "Location").is_none());
        assert_no_store(&resp);
        assert_eq!(body_text(resp).await, "<h1>Admin panel</h1>");
        assert!(site.state.gate.sessions().is_empty());

        // Every later navigation goes back to the login form
        let resp = get_with_cookie(&site, "/admin/", "admin_session=anything").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login"));
    }

    #[tokio::test]
    async fn test_reauthenticate_wrong_password_redirects() {
        let site = site_with(AuthPolicy::Reauthenticate, Some(PASSWORD), |_| {});
        let resp = post_login(&site, "password=nope").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), Some("/admin/login?error=1"));
    }

    #[tokio::test]
    async fn test_reauthenticate_missing_admin_document() {
        let site = site_with(AuthPolicy::Reauthenticate, Some(PASSWORD), |cfg| {
            cfg.site.admin_document = "admin/gone.html".to_string();
        });
        let resp = post_login(&site, &format!("password={PASSWORD}")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_unset_password_fails_closed() {
        let site = site_with(AuthPolicy::Session, None, |_| {});
        for form in ["password=", "password=anything", ""] {
            let resp = post_login(&site, form).await;
            assert_eq!(resp.status(), 500);
            assert!(body_text(resp)
                .await
                .contains("ADMIN_PASSWORD environment variable"));
        }
        assert!(site.state.gate.sessions().is_empty());
        assert_eq!(get(&site, "/admin/login").await.status(), 200);
        assert_eq!(get(&site, "/admin/").await.status(), 302);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let site = session_site();

        let resp = send(&site, Method::POST, "/style.css", &[], "").await;
        assert_eq!(resp.status(), 405);
        assert_eq!(header(&resp, "Allow"), Some("GET, HEAD"));

        assert_eq!(send(&site, Method::POST, "/admin/", &[], "").await.status(), 405);
        assert_eq!(send(&site, Method::PUT, "/", &[], "").await.status(), 405);
        assert_eq!(
            send(&site, Method::DELETE, "/admin/logout", &[], "").await.status(),
            405
        );

        let resp = send(&site, Method::PUT, "/admin/login", &[], "").await;
        assert_eq!(resp.status(), 405);
        assert_eq!(header(&resp, "Allow"), Some("GET, HEAD, POST"));
    }

    #[tokio::test]
    async fn test_oversized_login_body() {
        let site = site_with(AuthPolicy::Session, Some(PASSWORD), |cfg| {
            cfg.http.max_body_size = 16;
        });
        let form = format!("password={}", "x".repeat(64));
        let declared = form.len().to_string();

        // Declared length
        let resp = send(
            &site,
            Method::POST,
            "/admin/login",
            &[("Content-Length", declared.as_str())],
            &form,
        )
        .await;
        assert_eq!(resp.status(), 413);

        // Undeclared length, caught while reading
        let resp = post_login(&site, &form).await;
        assert_eq!(resp.status(), 413);
        assert!(site.state.gate.sessions().is_empty());
    }
}
