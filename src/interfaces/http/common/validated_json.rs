//! Validated body extractors for Axum
//!
//! `ValidatedJson<T>` and `ValidatedForm<T>` work like `axum::Json<T>` and
//! `axum::Form<T>`, but additionally run `validator::Validate::validate()` on
//! the deserialized value. Both reject with 400 and the validation messages.

use std::collections::BTreeSet;

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// JSON body that passed validation.
pub struct ValidatedJson<T>(pub T);

/// URL-encoded form body that passed validation.
pub struct ValidatedForm<T>(pub T);

/// Error type for validated extraction failures.
pub enum ValidatedRejection {
    /// The body could not be parsed.
    Malformed(String),
    /// Parsed, but failed validation.
    Invalid(validator::ValidationErrors),
}

impl ValidatedRejection {
    /// Distinct messages, so a shared "all fields required" text appears once.
    fn message(&self) -> String {
        match self {
            Self::Malformed(reason) => format!("Invalid request body: {}", reason),
            Self::Invalid(errors) => {
                let messages: BTreeSet<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| match &e.message {
                            Some(m) => m.to_string(),
                            None => format!("{}: {}", field, e.code),
                        })
                    })
                    .collect();

                if messages.is_empty() {
                    "Validation failed".to_string()
                } else {
                    messages.into_iter().collect::<Vec<_>>().join("; ")
                }
            }
        }
    }
}

impl IntoResponse for ValidatedRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message());
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

fn check<T: Validate>(value: T) -> Result<T, ValidatedRejection> {
    value.validate().map_err(ValidatedRejection::Invalid)?;
    Ok(value)
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidatedRejection::Malformed(e.body_text()))?;
        check(value).map(ValidatedJson)
    }
}

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidatedRejection::Malformed(e.body_text()))?;
        check(value).map(ValidatedForm)
    }
}

// ── Tests ──────────────────────────────────────────────────────
