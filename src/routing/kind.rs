//! Route classification
//!
//! Every request path maps to exactly one `RouteKind`; the router matches on
//! it exhaustively.

pub const ADMIN_PREFIX: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const LOGOUT_PATH: &str = "/admin/logout";
/// Landing page after a successful login
pub const ADMIN_HOME: &str = "/admin/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `/`, served as the index document
    Root,
    AdminLogin,
    AdminLogout,
    /// Any other path under `/admin`, protected by the gate
    AdminOther,
    /// Everything else, served from the document root
    StaticFile,
}

impl RouteKind {
    /// Classify a request path (without query string).
    ///
    /// `/admin` matches as a path segment: `/admin` and `/admin/...` are admin
    /// routes, `/administrator.html` is not.
    pub fn classify(path: &str) -> Self {
        match path {
            "/" => Self::Root,
            LOGIN_PATH => Self::AdminLogin,
            LOGOUT_PATH => Self::AdminLogout,
            _ if is_admin_path(path) => Self::AdminOther,
            _ => Self::StaticFile,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::AdminLogin | Self::AdminLogout | Self::AdminOther)
    }
}

fn is_admin_path(path: &str) -> bool {
    path.strip_prefix(ADMIN_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
