pub mod auth;
pub mod health;
pub mod home;
pub mod request_id;
pub mod users;
