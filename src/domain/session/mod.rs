//! Client session state

pub mod model;

pub use model::{AuthState, Session};
