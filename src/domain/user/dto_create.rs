use super::UserRole;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub username: String,
    pub secret: String,
    pub role: Option<UserRole>,
}

impl CreateUserDto {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            secret: secret.into(),
            role: Some(role),
        }
    }

    /// Every field is mandatory; the role comes back unwrapped on success.
    pub fn validate(&self) -> DomainResult<UserRole> {
        let missing = self.email.trim().is_empty()
            || self.username.trim().is_empty()
            || self.secret.is_empty();

        match self.role {
            Some(role) if !missing => Ok(role),
            _ => Err(DomainError::Validation(
                "All fields are required: email, username, secret, role".into(),
            )),
        }
    }
}
