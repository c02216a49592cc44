//! In-memory session store for admin authentication.
//!
//! Sessions live only in process memory and vanish on restart.

use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Thread-safe session store: token -> creation instant
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Instant>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new session and return its token
    pub fn create(&self) -> String {
        self.create_at(Instant::now())
    }

    /// Create a session as if it had been opened at `created_at`.
    ///
    /// Sessions already expired at that instant are swept first, so tokens
    /// that never come back do not accumulate.
    pub fn create_at(&self, created_at: Instant) -> String {
        let token = generate_token();
        let mut sessions = self.lock();
        sessions.retain(|_, opened| created_at.saturating_duration_since(*opened) <= self.ttl);
        sessions.insert(token.clone(), created_at);
        token
    }

    /// Check a token against the store at the current instant
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Instant::now())
    }

    /// Check a token at `now`; an expired entry is evicted on the way out
    pub fn is_valid_at(&self, token: &str, now: Instant) -> bool {
        let mut sessions = self.lock();
        let Some(created_at) = sessions.get(token).copied() else {
            return false;
        };

        if now.saturating_duration_since(created_at) > self.ttl {
            sessions.remove(token);
            return false;
        }
        true
    }

    /// Remove a session (logout). Returns whether it existed.
    pub fn remove(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lock().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Generate a session token: SHA-256 over the current time and 32 random bytes,
/// rendered as 64 lowercase hex characters.
pub fn generate_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut random = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random);

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_be_bytes());
    hasher.update(random);
    let digest = hasher.finalize();

    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_and_validate() {
        let store = SessionStore::new(DAY);
        let token = store.create();
        assert!(store.is_valid(&token));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_token() {
        let store = SessionStore::new(DAY);
        assert!(!store.is_valid("nonexistent"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_sweeps_abandoned_sessions() {
        let store = SessionStore::new(DAY);
        let start = Instant::now();
        let abandoned = store.create_at(start);
        let recent = store.create_at(start + Duration::from_secs(60 * 60));

        let fresh = store.create_at(start + DAY + Duration::from_secs(1));
        assert!(!store.contains(&abandoned));
        assert!(store.contains(&recent));
        assert!(store.contains(&fresh));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_valid_until_ttl_boundary() {
        let store = SessionStore::new(DAY);
        let start = Instant::now();
        let token = store.create_at(start);
        assert!(store.is_valid_at(&token, start + DAY));
        assert!(store.contains(&token));
    }

    #[test]
    fn test_expired_session_is_evicted() {
        let store = SessionStore::new(DAY);
        let start = Instant::now();
        let token = store.create_at(start);

        let later = start + DAY + Duration::from_secs(3600);
        assert!(!store.is_valid_at(&token, later));
        assert!(!store.contains(&token));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(DAY);
        let token = store.create();
        assert!(store.remove(&token));
        assert!(!store.is_valid(&token));
        assert!(!store.remove(&token));
    }
}
