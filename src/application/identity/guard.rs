//! Route authorization policy over session state

use tracing::warn;

use crate::domain::{AuthState, DomainError, Session, UserRole};

/// What a route demands of the caller's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
}

/// Why a guard refused a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// No one is logged in; send the client to the login entry point.
    Unauthenticated,
    /// Logged in, but the role is insufficient. Terminal for the request.
    Forbidden,
}

impl From<GuardRejection> for DomainError {
    fn from(_: GuardRejection) -> Self {
        DomainError::AccessDenied("Access denied".into())
    }
}

/// The caller a guard let through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub display_name: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn check(session: &Session, requirement: Requirement) -> Result<Principal, GuardRejection> {
        let AuthState::Authenticated { display_name, role } = session.auth() else {
            return Err(GuardRejection::Unauthenticated);
        };

        if requirement == Requirement::Admin && !role.is_admin() {
            warn!(user = %display_name, role = %role, "Admin-only operation denied");
            return Err(GuardRejection::Forbidden);
        }

        Ok(Principal {
            display_name: display_name.clone(),
            role: *role,
        })
    }

    pub fn require_authenticated(session: &Session) -> Result<Principal, GuardRejection> {
        Self::check(session, Requirement::Authenticated)
    }

    pub fn require_admin(session: &Session) -> Result<Principal, GuardRejection> {
        Self::check(session, Requirement::Admin)
    }
}
