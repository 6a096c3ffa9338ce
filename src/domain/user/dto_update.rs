use serde::Deserialize;

use super::UserRole;
use crate::domain::{DomainError, DomainResult};

/// Partial update. `None` leaves the field untouched; an empty string is
/// rejected instead of being read as "no change".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserDto {
    pub fn validate(&self) -> DomainResult<()> {
        let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());

        for (name, value) in [
            ("email", &self.email),
            ("username", &self.username),
            ("secret", &self.secret),
        ] {
            if blank(value) {
                return Err(DomainError::Validation(format!("{} cannot be empty", name)));
            }
        }
        Ok(())
    }
}
