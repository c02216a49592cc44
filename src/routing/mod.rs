//! Routing module
//!
//! Normalizes request paths and classifies them into the closed set of
//! routes the server knows.

mod kind;
mod path;

pub use kind::{RouteKind, ADMIN_HOME, ADMIN_PREFIX, LOGIN_PATH, LOGOUT_PATH};
pub use path::{encode_path, normalize_path};
