//! Authentication gate for the admin area
//!
//! Two policies are supported, selected by `admin.auth_policy`:
//!
//! | Policy           | Login success                  | Later admin requests        |
//! |------------------|--------------------------------|-----------------------------|
//! | `session`        | session cookie + redirect      | accepted while cookie valid |
//! | `reauthenticate` | admin page rendered in-place   | always sent back to login   |

use super::cookie::{find_cookie, SESSION_COOKIE_NAME};
use super::session::SessionStore;
use crate::config::AuthPolicy;

/// Result of a password submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Correct password. Carries the new session token under the session policy.
    Granted { session_token: Option<String> },
    /// Wrong password
    Denied,
    /// No admin secret configured, login is impossible
    NotConfigured,
}

pub struct AdminGate {
    policy: AuthPolicy,
    secret: Option<String>,
    sessions: SessionStore,
}

impl AdminGate {
    pub fn new(policy: AuthPolicy, secret: Option<String>, sessions: SessionStore) -> Self {
        Self {
            policy,
            secret,
            sessions,
        }
    }

    pub const fn policy(&self) -> AuthPolicy {
        self.policy
    }

    /// Whether an admin secret is configured at all
    pub const fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Decide whether a request carrying `cookie_header` may enter the admin area
    pub fn is_authenticated(&self, cookie_header: Option<&str>) -> bool {
        match self.policy {
            AuthPolicy::Reauthenticate => false,
            AuthPolicy::Session => find_cookie(cookie_header, SESSION_COOKIE_NAME)
                .is_some_and(|token| self.sessions.is_valid(token)),
        }
    }

    /// Check a submitted password against the configured secret
    pub fn login(&self, submitted: &str) -> LoginOutcome {
        let Some(secret) = self.secret.as_deref() else {
            return LoginOutcome::NotConfigured;
        };

        if submitted != secret {
            return LoginOutcome::Denied;
        }

        let session_token = match self.policy {
            AuthPolicy::Session => Some(self.sessions.create()),
            AuthPolicy::Reauthenticate => None,
        };
        LoginOutcome::Granted { session_token }
    }

    /// Drop the session named by the request cookie, if any. Returns whether one was removed.
    pub fn logout(&self, cookie_header: Option<&str>) -> bool {
        find_cookie(cookie_header, SESSION_COOKIE_NAME)
            .is_some_and(|token| self.sessions.remove(token))
    }
}

/// Extract the `password` field from a form-encoded body.
///
/// A missing field or an undecodable body yields the empty string; the first
/// occurrence wins when the field repeats.
pub fn password_from_form(body: &[u8]) -> String {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()
        .and_then(|pairs| {
            pairs
                .into_iter()
                .find(|(key, _)| key == "password")
                .map(|(_, value)| value)
        })
        .unwrap_or_default()
}
