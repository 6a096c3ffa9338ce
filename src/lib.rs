//! # roster-gate
//!
//! A small user directory with session-based login and role-gated routes.
//!
//! ## Architecture
//!
//! - **domain**: users, roles, session state and the repository trait
//! - **application**: `UserService`, `SessionAuthenticator` and `RouteGuard`
//! - **infrastructure**: the in-memory directory
//! - **session**: server-side session storage keyed by cookie id
//! - **interfaces**: the axum HTTP surface
//! - **support**: error types and shutdown signalling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod session;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::{RouteGuard, SessionAuthenticator, UserService};
pub use domain::{DomainError, DomainResult, PublicUser, Session, User, UserRole};
pub use infrastructure::InMemoryUserDirectory;
pub use interfaces::http::{create_router, AppState};
