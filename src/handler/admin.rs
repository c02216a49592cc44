//! Admin area handlers: login form, login submission, logout and the gated pages

use crate::auth::cookie::{expired_session_cookie, session_cookie};
use crate::auth::login_page::{query_requests_error, render_login_page};
use crate::auth::{password_from_form, LoginOutcome};
use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http::{self, cache};
use crate::logger;
use crate::routing::{RouteKind, ADMIN_HOME, LOGIN_PATH};

/// Where a failed login lands
pub const LOGIN_ERROR_PATH: &str = "/admin/login?error=1";

/// Message returned when login is attempted without `ADMIN_PASSWORD`
pub const MISSING_SECRET_MESSAGE: &str =
    "Admin access requires ADMIN_PASSWORD environment variable to be set";

/// `GET /admin/login`: always 200, with the error banner when `?error` is present
pub fn serve_login_page(ctx: &RequestContext<'_>) -> http::HttpResponse {
    let html = render_login_page(query_requests_error(ctx.query));
    http::build_html_response(html, &cache::no_store_headers(), ctx.is_head)
}

/// `POST /admin/login`
pub async fn login(ctx: &RequestContext<'_>, state: &AppState, body: &[u8]) -> http::HttpResponse {
    let submitted = password_from_form(body);

    match state.gate.login(&submitted) {
        LoginOutcome::NotConfigured => {
            logger::log_error(&format!("Admin login rejected: {MISSING_SECRET_MESSAGE}"));
            http::build_500_response(MISSING_SECRET_MESSAGE)
        }
        LoginOutcome::Denied => {
            logger::log_warning(&format!("Failed admin login attempt from {}", ctx.peer));
            http::build_redirect_response(LOGIN_ERROR_PATH, None)
        }
        LoginOutcome::Granted {
            session_token: Some(token),
        } => {
            logger::log_admin_login(&ctx.peer);
            http::build_redirect_response(ADMIN_HOME, Some(&session_cookie(&token)))
        }
        LoginOutcome::Granted {
            session_token: None,
        } => {
            logger::log_admin_login(&ctx.peer);
            static_files::serve_admin_document(
                ctx,
                &state.document_root,
                &state.config.site.admin_document,
            )
            .await
        }
    }
}

/// `GET /admin/logout`: drop the session if any, clear the cookie, back to `/`
pub fn logout(ctx: &RequestContext<'_>, state: &AppState) -> http::HttpResponse {
    if state.gate.logout(ctx.cookie) {
        logger::log_admin_logout(&ctx.peer);
    }
    http::build_redirect_response("/", Some(&expired_session_cookie()))
}

/// Any other `/admin` path: gate, then serve from the document root
pub async fn serve_protected(ctx: &RequestContext<'_>, state: &AppState) -> http::HttpResponse {
    if !state.gate.is_authenticated(ctx.cookie) {
        return http::build_redirect_response(LOGIN_PATH, None);
    }

    logger::log_admin_access(ctx.path);
    static_files::serve_path(
        ctx,
        &state.document_root,
        ctx.path,
        RouteKind::AdminOther,
        &state.config.site.index_file,
    )
    .await
}
