//! Health module: liveness and basic counters

pub mod handlers;

pub use handlers::*;
