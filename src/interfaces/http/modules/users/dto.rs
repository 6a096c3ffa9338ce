//! User DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{DomainResult, UpdateUserDto, UserRole};

/// Partial update body. Omitted fields stay as they are.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_dto(self) -> DomainResult<UpdateUserDto> {
        let role = self.role.as_deref().map(str::parse::<UserRole>).transpose()?;
        Ok(UpdateUserDto {
            email: self.email,
            username: self.username,
            secret: self.password,
            role,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted: bool,
}
