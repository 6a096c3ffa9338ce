//! HTTP interface
//!
//! - `middleware`: session resolution and the admin route layer
//! - `modules`: handlers grouped by resource
//! - `common`: response envelope, error mapping, validated extractors
//! - `router`: route table and shared state

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_router, AppState};
