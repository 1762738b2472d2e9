//! # Rolodex Config
//!
//! Configuration management for Rolodex.
//! Configuration is layered from TOML files and `ROLODEX_*` environment
//! variables, validated once at startup and then treated as immutable.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
