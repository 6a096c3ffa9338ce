//! Home module: role-specific landing page

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
