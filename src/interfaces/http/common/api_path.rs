//! Path extractor that reports bad parameters in the API envelope

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::ApiError;
use crate::domain::DomainError;

/// Works like `axum::extract::Path<T>`, but a parameter that fails to parse
/// is answered with a 400 `ApiResponse` rather than axum's plain-text body.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                DomainError::Validation(format!(
                    "Invalid path parameter: {}",
                    rejection.body_text()
                ))
            })?;
        Ok(Self(value))
    }
}
