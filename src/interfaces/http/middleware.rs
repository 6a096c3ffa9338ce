//! Session and authorization middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::application::{GuardRejection, RouteGuard};
use crate::config::SessionConfig;
use crate::domain::Session;
use crate::session::SharedSessionManager;

/// State for [`session_middleware`]
#[derive(Clone)]
pub struct SessionLayerState {
    pub sessions: SharedSessionManager,
    pub config: SessionConfig,
}

/// The caller's session, resolved from its cookie.
///
/// Handlers extract it with `Extension<ClientSession>` and persist whatever
/// state comes out of a transition through the session manager.
#[derive(Clone, Debug)]
pub struct ClientSession {
    pub id: String,
    pub session: Session,
}

fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(config: &SessionConfig, id: &str) -> String {
    let secure = if config.secure_cookie { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
        config.cookie_name, id, secure
    )
}

pub fn expired_session_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    )
}

/// Resolve the client session and expose it to handlers.
///
/// Unknown or missing cookies get a pending anonymous session. Its id is only
/// stored, and the cookie only sent, once a handler saves state under it and
/// has not set a cookie of its own.
pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let known = read_cookie(request.headers(), &state.config.cookie_name)
        .and_then(|id| state.sessions.load(&id).map(|session| (id, session)));

    let (client, fresh) = match known {
        Some((id, session)) => (ClientSession { id, session }, false),
        None => (
            ClientSession {
                id: state.sessions.issue_id(),
                session: Session::anonymous(),
            },
            true,
        ),
    };

    let pending_id = fresh.then(|| client.id.clone());
    request.extensions_mut().insert(client);

    let mut response = next.run(request).await;

    if let Some(id) = pending_id.filter(|id| state.sessions.contains(id)) {
        if !response.headers().contains_key(header::SET_COOKIE) {
            match HeaderValue::from_str(&session_cookie(&state.config, &id)) {
                Ok(value) => {
                    response.headers_mut().insert(header::SET_COOKIE, value);
                }
                Err(e) => warn!("Could not encode session cookie: {}", e),
            }
        }
    }

    response
}

/// Route layer for admin-only routes. Runs before body extraction, so access
/// is decided before any input is looked at.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    let verdict = match request.extensions().get::<ClientSession>() {
        Some(client) => RouteGuard::require_admin(&client.session).map(|_| ()),
        None => Err(GuardRejection::Unauthenticated),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(rejection) => rejection.into_response(),
    }
}
