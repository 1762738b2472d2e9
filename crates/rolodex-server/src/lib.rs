//! # Rolodex Server Library
//!
//! Wiring and startup for the Rolodex server: logging, the Redis pool,
//! and the assembly of repositories, services and the REST router.

pub mod app;
pub mod logging;
pub mod startup;
