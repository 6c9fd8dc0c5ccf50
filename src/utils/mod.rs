pub mod config;
pub mod currency;
pub mod formatting;
pub mod loader;

// Re-exports
pub use config::*;
pub use loader::*;
