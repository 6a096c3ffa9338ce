//! Auth module: login, logout and admin registration

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
