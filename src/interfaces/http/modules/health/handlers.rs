//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::application::UserService;
use crate::infrastructure::InMemoryUserDirectory;
use crate::session::SharedSessionManager;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub user_service: Arc<UserService<InMemoryUserDirectory>>,
    pub sessions: SharedSessionManager,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub users: usize,
    pub active_sessions: usize,
    pub authenticated_sessions: usize,
}

/// `GET /health`
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, http_status, users) = match state.user_service.count().await {
        Ok(n) => ("ok", StatusCode::OK, n),
        Err(_) => ("degraded", StatusCode::SERVICE_UNAVAILABLE, 0),
    };

    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        users,
        active_sessions: state.sessions.session_count(),
        authenticated_sessions: state.sessions.authenticated_count(),
    };

    (http_status, Json(body))
}
