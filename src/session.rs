//! In-memory flash messages keyed by session id.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "fc_session";

/// Unread flashes are dropped after this long.
pub const FLASH_TTL: Duration = Duration::from_secs(30 * 60);

/// Sessions kept at most; the oldest is evicted first.
pub const MAX_SESSIONS: usize = 10_000;

struct Flashes {
    touched: Instant,
    messages: HashMap<String, String>,
}

/// Flash messages survive until read once, expire after `ttl`, and at most `max_sessions`
/// sessions are held.
pub struct SessionStore {
    flashes: RwLock<HashMap<Uuid, Flashes>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::with_limits(FLASH_TTL, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        SessionStore {
            flashes: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn put_flash(&self, session: Uuid, key: &str, value: &str) {
        let now = Instant::now();
        let mut guard = self.flashes.write().unwrap_or_else(|e| e.into_inner());
        guard.retain(|_, f| now.duration_since(f.touched) < self.ttl);
        if !guard.contains_key(&session) && guard.len() >= self.max_sessions {
            let oldest = guard.iter().min_by_key(|(_, f)| f.touched).map(|(id, _)| *id);
            if let Some(id) = oldest {
                guard.remove(&id);
            }
        }
        let entry = guard.entry(session).or_insert_with(|| Flashes {
            touched: now,
            messages: HashMap::new(),
        });
        entry.touched = now;
        entry.messages.insert(key.to_string(), value.to_string());
    }

    /// Return and clear the flash under `key`.
    pub fn take_flash(&self, session: Uuid, key: &str) -> Option<String> {
        let mut guard = self.flashes.write().unwrap_or_else(|e| e.into_inner());
        let flashes = guard.get_mut(&session)?;
        let expired = flashes.touched.elapsed() >= self.ttl;
        let value = flashes.messages.remove(key).filter(|_| !expired);
        if expired || flashes.messages.is_empty() {
            guard.remove(&session);
        }
        value
    }

    pub fn has_session(&self, session: Uuid) -> bool {
        self.flashes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&session)
            .is_some_and(|f| f.touched.elapsed() < self.ttl)
    }
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(session: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session)
}

/// Find the session id in a `Cookie` header value.
pub fn parse_session_cookie(header: &str) -> Option<Uuid> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_read_once() {
        let store = SessionStore::new();
        let sid = Uuid::new_v4();
        store.put_flash(sid, "status", "Saved");
        assert!(store.has_session(sid));
        assert_eq!(store.take_flash(sid, "status").as_deref(), Some("Saved"));
        assert_eq!(store.take_flash(sid, "status"), None);
        assert!(!store.has_session(sid));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.put_flash(a, "status", "A");
        assert_eq!(store.take_flash(b, "status"), None);
        assert_eq!(store.take_flash(a, "status").as_deref(), Some("A"));
    }

    #[test]
    fn test_expired_flash_is_dropped() {
        let store = SessionStore::with_limits(Duration::ZERO, 10);
        let sid = Uuid::new_v4();
        store.put_flash(sid, "status", "Saved");
        assert!(!store.has_session(sid));
        assert_eq!(store.take_flash(sid, "status"), None);
    }

    #[test]
    fn test_oldest_session_evicted_at_capacity() {
        let store = SessionStore::with_limits(FLASH_TTL, 2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.put_flash(a, "status", "A");
        std::thread::sleep(Duration::from_millis(2));
        store.put_flash(b, "status", "B");
        std::thread::sleep(Duration::from_millis(2));
        store.put_flash(c, "status", "C");
        assert!(!store.has_session(a));
        assert_eq!(store.take_flash(b, "status").as_deref(), Some("B"));
        assert_eq!(store.take_flash(c, "status").as_deref(), Some("C"));
    }

    #[test]
    fn test_parse_session_cookie() {
        let sid = Uuid::new_v4();
        let header = format!("theme=dark; {}={}; other=1", SESSION_COOKIE, sid);
        assert_eq!(parse_session_cookie(&header), Some(sid));
        assert_eq!(parse_session_cookie("theme=dark"), None);
        assert_eq!(parse_session_cookie(&format!("{}=not-a-uuid", SESSION_COOKIE)), None);
    }

    #[test]
    fn test_session_cookie_roundtrips_through_parser() {
        let sid = Uuid::new_v4();
        let set = session_cookie(sid);
        let pair = set.split(';').next().unwrap();
        assert_eq!(parse_session_cookie(pair), Some(sid));
    }
}
