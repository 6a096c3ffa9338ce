//! Authentication DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form submission. Missing fields deserialize as empty and fail validation.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required!"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required!"))]
    pub password: String,
}

/// Account creation form (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub password: String,
    /// `admin` or `standard`; older forms post this as `type`
    #[serde(default, alias = "type")]
    #[validate(length(min = 1, message = "All fields are required!"))]
    pub role: String,
}

/// What the login entry point offers an anonymous caller
#[derive(Debug, Serialize)]
pub struct LoginForm {
    pub action: &'static str,
    pub fields: Vec<&'static str>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            action: "/login",
            fields: vec!["email", "password"],
        }
    }
}
