use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::support::DomainError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Standard,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Standard => "standard",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            // "user" is the spelling older seed data uses
            "standard" | "user" => Ok(UserRole::Standard),
            other => Err(DomainError::Validation(format!(
                "Unknown role '{}': expected admin or standard",
                other
            ))),
        }
    }
}

/// A directory record. The secret never leaves the crate; external callers
/// only ever see [`PublicUser`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub username: String,
    secret: String,
    pub role: UserRole,
}

impl User {
    pub(crate) fn new(
        id: u64,
        email: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            secret: secret.into(),
            role,
        }
    }

    #[cfg(test)]
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn set_secret(&mut self, secret: String) {
        self.secret = secret;
    }

    /// Plain equality, no hashing.
    pub(crate) fn secret_matches(&self, candidate: &str) -> bool {
        self.secret == candidate
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// User without its secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub role: UserRole,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            role: u.role,
        }
    }
}
