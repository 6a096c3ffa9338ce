//! HTTP router

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::middleware::{require_admin, session_middleware, SessionLayerState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, health, home, users};
use crate::application::{SessionAuthenticator, UserService};
use crate::config::SessionConfig;
use crate::infrastructure::InMemoryUserDirectory;
use crate::session::SharedSessionManager;

/// Shared state for every route. Axum extracts each handler's own state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<InMemoryUserDirectory>>,
    pub authenticator: Arc<SessionAuthenticator<InMemoryUserDirectory>>,
    pub sessions: SharedSessionManager,
    pub session_config: SessionConfig,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wire both services to the one directory instance built at startup.
    pub fn new(
        directory: Arc<InMemoryUserDirectory>,
        sessions: SharedSessionManager,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(directory.clone())),
            authenticator: Arc::new(SessionAuthenticator::new(directory)),
            sessions,
            session_config,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            authenticator: Arc::clone(&s.authenticator),
            user_service: Arc::clone(&s.user_service),
            sessions: Arc::clone(&s.sessions),
            session_config: s.session_config.clone(),
        }
    }
}

impl FromRef<AppState> for home::HomeHandlerState {
    fn from_ref(s: &AppState) -> Self {
        home::HomeHandlerState {
            sessions: Arc::clone(&s.sessions),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            user_service: Arc::clone(&s.user_service),
            sessions: Arc::clone(&s.sessions),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Build the router with all routes
pub fn create_router(state: AppState) -> Router {
    let session_layer = SessionLayerState {
        sessions: Arc::clone(&state.sessions),
        config: state.session_config.clone(),
    };

    let admin_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/home", get(home::home))
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(session_layer, session_middleware))
        // Added after the session layer so probes never touch the session store
        .route("/health", get(health::health_check))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use serde_json::Value;

    use super::*;
    use crate::config::AppConfig;
    use crate::session::create_session_manager;

    fn app() -> (Router, AppState) {
        let directory =
            Arc::new(InMemoryUserDirectory::with_users(AppConfig::default().seed_users()).unwrap());
        let state = AppState::new(directory, create_session_manager(), SessionConfig::default());
        (create_router(state.clone()), state)
    }

    async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        use tower::Service;
        let mut svc = app.clone().into_service();
        svc.call(req).await.unwrap()
    }

    async fn json(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(resp: &Response<Body>) -> &str {
        resp.headers()[header::LOCATION].to_str().unwrap()
    }

    fn cookie_of(resp: &Response<Body>) -> String {
        let raw = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// Log in without a prior cookie; returns the cookie pair to send back.
    async fn login_as(app: &Router, email: &str, password: &str) -> String {
        let resp = send(
            app,
            form("/login", None, &format!("email={}&password={}", email, password)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/home");
        let cookie = cookie_of(&resp);
        assert!(cookie.starts_with("roster_sid="));
        cookie
    }

    #[tokio::test]
    async fn login_page_offers_form_without_storing_a_session() {
        let (app, state) = app();
        let resp = send(&app, get("/login", None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!resp.headers().contains_key(header::SET_COOKIE));
        assert!(resp.headers().contains_key("x-request-id"));
        let body = json(resp).await;
        assert_eq!(body["data"]["fields"][0], "email");
        assert_eq!(state.sessions.session_count(), 0);
    }

    #[tokio::test]
    async fn cookieless_traffic_does_not_grow_the_session_store() {
        let (app, state) = app();
        for _ in 0..200 {
            let resp = send(&app, get("/health", None)).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(!resp.headers().contains_key(header::SET_COOKIE));
        }
        for _ in 0..50 {
            send(&app, get("/home", None)).await;
            send(&app, get("/users", None)).await;
            send(&app, form("/login", None, "email=admin@example.com&password=nope")).await;
        }
        assert_eq!(state.sessions.session_count(), 0);

        let resp = send(&app, get("/home", Some("roster_sid=forged-id"))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.sessions.session_count(), 0);
    }

    #[tokio::test]
    async fn home_requires_login() {
        let (app, _) = app();
        let resp = send(&app, get("/home", None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_generically() {
        let (app, _) = app();
        let resp = send(
            &app,
            form("/login", None, "email=admin@example.com&password=nope"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(resp).await["error"], "Incorrect email or password!");
    }

    #[tokio::test]
    async fn missing_login_fields_are_reported() {
        let (app, _) = app();
        let resp = send(&app, form("/login", None, "email=admin@example.com")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(resp).await["error"], "Email and password are required!");
    }

    #[tokio::test]
    async fn standard_user_home_and_redirect_from_login() {
        let (app, _) = app();
        let cookie = login_as(&app, "user@example.com", "abcdef").await;

        let resp = send(&app, get("/home", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["data"]["view"], "home");
        assert_eq!(body["data"]["role"], "standard");
        assert_eq!(body["data"]["message"], "Welcome back, user!");

        let resp = send(&app, get("/login", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/home");
    }

    #[tokio::test]
    async fn admin_registers_user_and_sees_notice_once() {
        let (app, state) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let resp = send(
            &app,
            form(
                "/register",
                Some(&cookie),
                "email=new@example.com&username=newbie&password=pw&type=user",
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/home");
        assert_eq!(state.user_service.count().await.unwrap(), 3);

        let body = json(send(&app, get("/home", Some(&cookie))).await).await;
        assert_eq!(body["data"]["view"], "admin/home");
        assert_eq!(body["data"]["name"], "admin");
        assert_eq!(body["data"]["message"], "User (ID: 3) created successfully.");

        let body = json(send(&app, get("/home", Some(&cookie))).await).await;
        assert_eq!(body["data"]["message"], "");
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict_not_a_crash() {
        let (app, state) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let resp = send(
            &app,
            form(
                "/register",
                Some(&cookie),
                "email=user@example.com&username=dup&password=pw&role=standard",
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json(resp).await["error"], "Email already exists");
        assert_eq!(state.user_service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn registration_with_missing_fields_or_bad_role() {
        let (app, _) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let resp = send(
            &app,
            form("/register", Some(&cookie), "email=x@example.com&username=x"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(resp).await["error"], "All fields are required!");

        let resp = send(
            &app,
            form(
                "/register",
                Some(&cookie),
                "email=x@example.com&username=x&password=pw&role=owner",
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_admin_registration_is_denied() {
        let (app, state) = app();
        let cookie = login_as(&app, "user@example.com", "abcdef").await;

        let resp = send(
            &app,
            form(
                "/register",
                Some(&cookie),
                "email=x@example.com&username=x&password=pw&role=admin",
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.user_service.count().await.unwrap(), 2);

        let resp = send(
            &app,
            form("/register", None, "email=x@example.com&username=x&password=pw&role=admin"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        assert_eq!(state.user_service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn admin_lists_users_without_secrets() {
        let (app, _) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let resp = send(&app, get("/users", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        let users = body["data"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        for user in users {
            assert!(user.get("secret").is_none());
            assert!(user.get("password").is_none());
        }
        assert_eq!(users[0]["email"], "admin@example.com");
    }

    #[tokio::test]
    async fn standard_user_cannot_list_users() {
        let (app, _) = app();
        let cookie = login_as(&app, "user@example.com", "abcdef").await;
        let resp = send(&app, get("/users", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_updates_and_deletes_users() {
        let (app, _) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let put = Request::builder()
            .method("PUT")
            .uri("/users/2")
            .header(header::COOKIE, &cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"renamed"}"#))
            .unwrap();
        let resp = send(&app, put).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["data"]["username"], "renamed");
        assert_eq!(body["data"]["email"], "user@example.com");

        let conflict = Request::builder()
            .method("PUT")
            .uri("/users/2")
            .header(header::COOKIE, &cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"admin@example.com"}"#))
            .unwrap();
        assert_eq!(send(&app, conflict).await.status(), StatusCode::CONFLICT);

        let delete = |id: u64| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/{}", id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap()
        };
        let body = json(send(&app, delete(2)).await).await;
        assert_eq!(body["data"]["deleted"], true);
        let body = json(send(&app, delete(2)).await).await;
        assert_eq!(body["data"]["deleted"], false);

        let resp = send(&app, get("/users/2", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_user_id_gets_json_error() {
        let (app, _) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;

        let resp = send(&app, get("/users/abc", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid path parameter"));

        let resp = send(&app, get("/users/abc", None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn logout_destroys_session() {
        let (app, state) = app();
        let cookie = login_as(&app, "admin@example.com", "123456").await;
        assert_eq!(state.sessions.authenticated_count(), 1);

        let resp = send(&app, get("/logout", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        assert!(resp.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
        assert_eq!(state.sessions.authenticated_count(), 0);
        assert_eq!(state.sessions.session_count(), 0);

        let resp = send(&app, get("/home", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let (app, _) = app();
        let resp = send(&app, get("/health", None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["users"], 2);
    }
}
