//! # Rolodex Security
//!
//! Credential hashing (Argon2id) and signed, expiring bearer tokens (JWT).

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
