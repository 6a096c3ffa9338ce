pub mod session;
pub mod user;

pub use session::{AuthState, Session};
pub use user::{CreateUserDto, PublicUser, UpdateUserDto, User, UserRepositoryInterface, UserRole};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
