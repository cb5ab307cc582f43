// Server-side sessions
// Decision: The client only ever holds an opaque random session id (cookie);
// the signed credential stays on the server
// Decision: Session ids are minted by the server at login, never taken from the client

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;

/// Generate a random session identifier (64 hex characters)
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// What the server remembers about a logged-in session
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Signed credential issued at login
    pub access_token: String,
    /// Username the credential was issued to
    pub username: String,
    /// When the credential was bound
    pub created_at: DateTime<Utc>,
    /// Last time the session was used
    pub last_seen_at: DateTime<Utc>,
}

/// Session table keyed by session id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a credential to a session, replacing whatever it held.
    pub fn bind(&self, session_id: &str, access_token: String, username: &str) {
        let now = Utc::now();
        self.sessions.write().insert(
            session_id.to_string(),
            SessionEntry {
                access_token,
                username: username.to_string(),
                created_at: now,
                last_seen_at: now,
            },
        );
    }

    /// Look up a session and mark it as used.
    pub fn touch(&self, session_id: &str) -> Option<SessionEntry> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen_at = Utc::now();
        Some(entry.clone())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    /// End a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    /// End a session only if its current entry satisfies `matches`.
    /// Returns whether it was removed.
    pub fn remove_if(&self, session_id: &str, matches: impl FnOnce(&SessionEntry) -> bool) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get(session_id) {
            Some(entry) if matches(entry) => {
                sessions.remove(session_id);
                true
            }
            _ => false,
        }
    }

    /// Drop sessions not used within `max_idle`. Returns how many were dropped.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen_at >= cutoff);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_id() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_bind_and_touch() {
        let store = SessionStore::new();
        assert!(store.touch("missing").is_none());

        store.bind("sid", "token-1".to_string(), "alice");
        let entry = store.touch("sid").unwrap();
        assert_eq!(entry.access_token, "token-1");
        assert_eq!(entry.username, "alice");
        assert!(entry.last_seen_at >= entry.created_at);
    }

    #[test]
    fn test_rebind_replaces_credential() {
        let store = SessionStore::new();
        store.bind("sid", "token-1".to_string(), "alice");
        store.bind("sid", "token-2".to_string(), "bob");

        assert_eq!(store.len(), 1);
        let entry = store.touch("sid").unwrap();
        assert_eq!(entry.access_token, "token-2");
        assert_eq!(entry.username, "bob");
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        store.bind("sid", "token".to_string(), "alice");
        assert!(store.remove("sid"));
        assert!(!store.remove("sid"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_if_keeps_rebound_session() {
        let store = SessionStore::new();
        store.bind("sid", "stale".to_string(), "alice");
        let seen = store.touch("sid").unwrap();

        // Re-login lands between the lookup and the removal
        store.bind("sid", "fresh".to_string(), "alice");

        assert!(!store.remove_if("sid", |e| e.access_token == seen.access_token));
        assert_eq!(store.touch("sid").unwrap().access_token, "fresh");

        assert!(store.remove_if("sid", |e| e.access_token == "fresh"));
        assert!(!store.contains("sid"));
        assert!(!store.remove_if("sid", |_| true));
    }

    #[test]
    fn test_prune_idle() {
        let store = SessionStore::new();
        store.bind("fresh", "token".to_string(), "alice");
        store.bind("stale", "token".to_string(), "bob");
        store.sessions.write().get_mut("stale").unwrap().last_seen_at =
            Utc::now() - Duration::hours(2);

        assert_eq!(store.prune_idle(Duration::hours(1)), 1);
        assert!(store.contains("fresh"));
        assert!(!store.contains("stale"));
    }
}
