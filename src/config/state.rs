// Application state module
// Owns everything a request handler needs: configuration, the admin gate and log switches

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use super::types::Config;
use crate::auth::{AdminGate, SessionStore};

/// Application state, shared by every connection
pub struct AppState {
    pub config: Config,
    /// Directory served as `/`
    pub document_root: PathBuf,
    /// Authentication gate for `/admin`, holds the secret and the session store
    pub gate: AdminGate,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` from loaded configuration and the admin secret
    ///
    /// `admin_password` is `None` when `ADMIN_PASSWORD` is unset, which
    /// disables admin login.
    pub fn new(config: &Config, admin_password: Option<String>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.admin.session_ttl_secs));
        let gate = AdminGate::new(config.admin.auth_policy, admin_password, sessions);

        Self {
            config: config.clone(),
            document_root: PathBuf::from(&config.site.root),
            gate,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
