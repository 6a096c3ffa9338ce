//! Session manager - server-side storage of per-client sessions

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Session;

/// Stored session plus the time the client last used it.
#[derive(Debug, Clone)]
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

impl SessionEntry {
    fn new(session: Session) -> Self {
        Self {
            session,
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_idle(&self, idle_timeout: Duration) -> bool {
        self.last_activity.elapsed() >= idle_timeout
    }
}

/// Maps opaque session ids (carried in the client's cookie) to session state.
///
/// Each id belongs to exactly one client, so entries are never shared.
/// Only non-default state is stored: nothing exists for an id until a handler
/// saves an authenticated session or a notice under it.
pub struct SessionManager {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Allocate a fresh id. The id stays unknown to the manager until saved.
    pub fn issue_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Current state for `id`, if the id is known. Counts as activity.
    pub fn load(&self, id: &str) -> Option<Session> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.touch();
            entry.session.clone()
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Replace the state stored under `id`. A plain anonymous session holds
    /// nothing worth keeping, so saving one drops the entry instead.
    pub fn save(&self, id: &str, session: Session) {
        if session == Session::anonymous() {
            self.remove(id);
            return;
        }
        if self
            .sessions
            .insert(id.to_string(), SessionEntry::new(session))
            .is_none()
        {
            debug!(session_id = %id, "Session opened");
        }
    }

    /// Destroy the session; the id is not valid afterwards
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!(session_id = %id, "Session destroyed");
        }
        removed
    }

    /// Drop every session unused for at least `idle_timeout`; returns how many went.
    pub fn evict_idle(&self, idle_timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_idle(idle_timeout));
        before.saturating_sub(self.sessions.len())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn authenticated_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.value().session.is_authenticated())
            .count()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe session manager
pub type SharedSessionManager = Arc<SessionManager>;

pub fn create_session_manager() -> SharedSessionManager {
    Arc::new(SessionManager::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    #[test]
    fn issued_ids_are_unique_and_not_stored() {
        let manager = SessionManager::new();
        let id = manager.issue_id();
        assert_ne!(id, manager.issue_id());
        assert!(manager.load(&id).is_none());
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn save_and_remove() {
        let manager = SessionManager::new();
        let id = manager.issue_id();
        manager.save(&id, Session::authenticated("alice", UserRole::Standard));
        assert!(manager.contains(&id));
        assert_eq!(manager.authenticated_count(), 1);

        assert!(manager.remove(&id));
        assert!(manager.load(&id).is_none());
        assert!(!manager.remove(&id));
    }

    #[test]
    fn saving_plain_anonymous_state_drops_the_entry() {
        let manager = SessionManager::new();
        manager.save("a", Session::authenticated("alice", UserRole::Standard));
        manager.save("a", Session::anonymous());
        assert!(!manager.contains("a"));

        manager.save("b", Session::anonymous());
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn unknown_id_loads_nothing() {
        let manager = SessionManager::new();
        assert!(manager.load("not-a-session").is_none());
    }

    #[test]
    fn evict_idle_drops_only_stale_sessions() {
        let manager = SessionManager::new();
        manager.save("a", Session::authenticated("alice", UserRole::Admin));
        manager.save("b", Session::anonymous().with_notice("bye"));

        assert_eq!(manager.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(manager.session_count(), 2);

        assert_eq!(manager.evict_idle(Duration::ZERO), 2);
        assert_eq!(manager.session_count(), 0);
    }
}
