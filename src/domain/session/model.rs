use serde::Serialize;

use crate::domain::UserRole;

/// Authentication half of a session. Name and role exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    Authenticated { display_name: String, role: UserRole },
}

/// Per-client session value.
///
/// Transitions consume the session and hand back the next one, so a handler
/// always writes an explicit new state rather than poking at fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    auth: AuthState,
    notice: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            auth: AuthState::Anonymous,
            notice: None,
        }
    }

    /// Only the authenticator builds authenticated sessions.
    pub(crate) fn authenticated(display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            auth: AuthState::Authenticated {
                display_name: display_name.into(),
                role,
            },
            notice: None,
        }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, AuthState::Authenticated { .. })
    }

    pub fn role(&self) -> Option<UserRole> {
        match &self.auth {
            AuthState::Authenticated { role, .. } => Some(*role),
            AuthState::Anonymous => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match &self.auth {
            AuthState::Authenticated { display_name, .. } => Some(display_name),
            AuthState::Anonymous => None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// One-shot read: the returned session no longer carries the notice.
    pub fn take_notice(mut self) -> (Self, Option<String>) {
        let notice = self.notice.take();
        (self, notice)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_anonymous() {
        let s = Session::default();
        assert!(!s.is_authenticated());
        assert_eq!(s.role(), None);
        assert_eq!(s.display_name(), None);
        assert_eq!(s.take_notice().1, None);
    }

    #[test]
    fn authenticated_carries_name_and_role() {
        let s = Session::authenticated("alice", UserRole::Admin);
        assert!(s.is_authenticated());
        assert_eq!(s.role(), Some(UserRole::Admin));
        assert_eq!(s.display_name(), Some("alice"));
    }

    #[test]
    fn notice_is_read_once() {
        let s = Session::authenticated("alice", UserRole::Admin).with_notice("hello");
        let (s, first) = s.take_notice();
        assert_eq!(first.as_deref(), Some("hello"));
        let (s, second) = s.take_notice();
        assert_eq!(second, None);
        assert!(s.is_authenticated());
    }
}
