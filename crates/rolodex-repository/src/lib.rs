//! # Rolodex Repository
//!
//! Data access for users and contacts.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserDirectory> / Arc<dyn ContactRepository>
//! MySqlUserDirectory / MySqlContactRepository   (SQLx)
//!   ↓
//! MySQL
//! ```
//!
//! [`memory`] holds in-process implementations of the same traits for
//! tests and for running without a database.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
