use async_trait::async_trait;

use super::{CreateUserDto, PublicUser, UpdateUserDto, User};
use crate::domain::DomainResult;

/// Storage seam for the user directory.
///
/// Implementations own id assignment and email uniqueness: the uniqueness
/// check and the write it guards must happen atomically with respect to
/// other callers.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// All users in insertion order, secrets stripped.
    async fn list_users(&self) -> DomainResult<Vec<PublicUser>>;
    async fn get_user(&self, id: u64) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Fails with `Validation` on a missing field and `Conflict` on a taken email.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;
    /// `Ok(None)` when the id does not exist.
    async fn update_user(&self, id: u64, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    /// Returns whether a record was removed.
    async fn delete_user(&self, id: u64) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<usize>;
}
