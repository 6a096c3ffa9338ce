//! Session management - per-client authentication state keyed by cookie id

pub mod manager;
pub mod sweeper;

pub use manager::{create_session_manager, SessionManager, SharedSessionManager};
pub use sweeper::start_session_sweeper;
