//! Directory storage implementations

mod memory;

pub use memory::InMemoryUserDirectory;
