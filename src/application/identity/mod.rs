//! Identity module: user management, authentication and route guards
//!
//! `UserService` covers directory use-cases, `SessionAuthenticator` the
//! login/logout transitions, and `RouteGuard` the per-route policy.

pub mod guard;
pub mod service;

pub use guard::{GuardRejection, Principal, Requirement, RouteGuard};
pub use service::{SessionAuthenticator, UserService};
