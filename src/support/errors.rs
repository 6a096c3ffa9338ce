use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Deliberately says nothing about which credential was wrong.
    #[error("Incorrect email or password!")]
    InvalidCredentials,

    #[error("{0}")]
    AccessDenied(String),
}

impl DomainError {
    pub fn user_not_found(id: u64) -> Self {
        DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
