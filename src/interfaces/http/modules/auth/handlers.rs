//! Authentication handlers: login entry point, login, registration, logout

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};

use super::dto::{LoginForm, LoginRequest, RegisterRequest};
use crate::application::{SessionAuthenticator, UserService};
use crate::config::SessionConfig;
use crate::domain::{CreateUserDto, UserRole};
use crate::infrastructure::InMemoryUserDirectory;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedForm, HOME_PATH, LOGIN_PATH};
use crate::interfaces::http::middleware::{expired_session_cookie, ClientSession};
use crate::session::SharedSessionManager;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub authenticator: Arc<SessionAuthenticator<InMemoryUserDirectory>>,
    pub user_service: Arc<UserService<InMemoryUserDirectory>>,
    pub sessions: SharedSessionManager,
    pub session_config: SessionConfig,
}

/// `GET /login`
pub async fn login_page(Extension(client): Extension<ClientSession>) -> Response {
    if client.session.is_authenticated() {
        return Redirect::to(HOME_PATH).into_response();
    }
    Json(ApiResponse::success(LoginForm::default())).into_response()
}

/// `POST /login`
pub async fn login(
    State(state): State<AuthHandlerState>,
    Extension(client): Extension<ClientSession>,
    ValidatedForm(request): ValidatedForm<LoginRequest>,
) -> Result<Redirect, ApiError> {
    let session = state
        .authenticator
        .login(&request.email, &request.password)
        .await?;
    state.sessions.save(&client.id, session);
    Ok(Redirect::to(HOME_PATH))
}

/// `POST /register`, behind the admin route layer
pub async fn register(
    State(state): State<AuthHandlerState>,
    Extension(client): Extension<ClientSession>,
    ValidatedForm(request): ValidatedForm<RegisterRequest>,
) -> Result<Redirect, ApiError> {
    let role: UserRole = request.role.parse()?;
    let dto = CreateUserDto::new(request.email, request.username, request.password, role);

    let user = state.user_service.register(&client.session, dto).await?;

    let notice = format!("User (ID: {}) created successfully.", user.id);
    state
        .sessions
        .save(&client.id, client.session.with_notice(notice));
    Ok(Redirect::to(HOME_PATH))
}

/// `GET /logout`: destroys the session and clears the cookie
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Extension(client): Extension<ClientSession>,
) -> Response {
    let next = state.authenticator.logout(client.session);
    state.sessions.save(&client.id, next);

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&expired_session_cookie(&state.session_config)) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
