//! User management and session authentication
//!
//! HTTP handlers stay thin and delegate to the two services here.

use std::sync::Arc;

use tracing::{info, warn};

use super::guard::RouteGuard;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, PublicUser, Session, UpdateUserDto, User,
    UserRepositoryInterface,
};

/// User service: directory use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete storage.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<PublicUser>> {
        self.repo.list_users().await
    }

    /// Single user without secret; `NotFound` when the id is unknown.
    pub async fn get_user(&self, id: u64) -> DomainResult<PublicUser> {
        self.repo
            .get_user(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    pub async fn count(&self) -> DomainResult<usize> {
        self.repo.count().await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Admin-only account creation. `actor` is the session of the caller;
    /// the directory is untouched unless it belongs to an admin.
    pub async fn register(&self, actor: &Session, dto: CreateUserDto) -> DomainResult<User> {
        let admin = RouteGuard::require_admin(actor)?;
        let user = self.repo.create_user(dto).await?;
        info!(user_id = user.id, created_by = %admin.display_name, "New user registered");
        Ok(user)
    }

    pub async fn update_user(&self, id: u64, dto: UpdateUserDto) -> DomainResult<PublicUser> {
        self.repo
            .update_user(id, dto)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    pub async fn delete_user(&self, id: u64) -> DomainResult<bool> {
        self.repo.delete_user(id).await
    }
}

/// Drives the Anonymous ⇄ Authenticated session state machine.
pub struct SessionAuthenticator<R: UserRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: UserRepositoryInterface> SessionAuthenticator<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validate credentials and return the authenticated session.
    ///
    /// On any error the caller keeps the session it already had.
    pub async fn login(&self, email: &str, secret: &str) -> DomainResult<Session> {
        if email.trim().is_empty() || secret.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required!".into(),
            ));
        }

        let user = self.repo.get_user_by_email(email).await?;
        match user {
            Some(user) if user.secret_matches(secret) => {
                info!(user_id = user.id, role = %user.role, "Login succeeded");
                Ok(Session::authenticated(user.username, user.role))
            }
            _ => {
                warn!("Login failed: invalid credentials");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Unconditional transition back to Anonymous; any pending notice is dropped.
    pub fn logout(&self, current: Session) -> Session {
        if let Some(name) = current.display_name() {
            info!(user = %name, "Logged out");
        }
        Session::anonymous()
    }
}
