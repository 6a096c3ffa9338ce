//! User management API handlers
//!
//! Admin-only endpoints; the router puts them behind the admin route layer.
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{DeleteUserResponse, UpdateUserRequest};
use crate::application::UserService;
use crate::domain::PublicUser;
use crate::infrastructure::InMemoryUserDirectory;
use crate::interfaces::http::common::{ApiError, ApiPath, ApiResponse, ValidatedJson};

/// User handler state: concrete over the in-memory directory for Axum compatibility.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService<InMemoryUserDirectory>>,
}

/// `GET /users`
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<PublicUser>>>, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<UserHandlerState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// `PUT /users/{id}`
pub async fn update_user(
    State(state): State<UserHandlerState>,
    ApiPath(id): ApiPath<u64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let dto = request.into_dto()?;
    let user = state.user_service.update_user(id, dto).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<ApiResponse<DeleteUserResponse>>, ApiError> {
    let deleted = state.user_service.delete_user(id).await?;
    Ok(Json(ApiResponse::success(DeleteUserResponse { deleted })))
}
