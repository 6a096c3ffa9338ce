use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::HomeView;
use crate::application::RouteGuard;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::ClientSession;
use crate::session::SharedSessionManager;

#[derive(Clone)]
pub struct HomeHandlerState {
    pub sessions: SharedSessionManager,
}

/// `GET /home`. Consumes the session's one-shot notice.
pub async fn home(
    State(state): State<HomeHandlerState>,
    Extension(client): Extension<ClientSession>,
) -> Response {
    let principal = match RouteGuard::require_authenticated(&client.session) {
        Ok(p) => p,
        Err(rejection) => return rejection.into_response(),
    };

    let (session, notice) = client.session.take_notice();
    state.sessions.save(&client.id, session);

    let view = if principal.is_admin() {
        HomeView {
            view: "admin/home",
            message: notice.unwrap_or_default(),
            name: principal.display_name,
            role: principal.role,
        }
    } else {
        HomeView {
            view: "home",
            message: notice
                .unwrap_or_else(|| format!("Welcome back, {}!", principal.display_name)),
            name: principal.display_name,
            role: principal.role,
        }
    };

    Json(ApiResponse::success(view)).into_response()
}
