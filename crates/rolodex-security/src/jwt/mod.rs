//! JWT token management.

mod claims;
mod token_codec;

pub use claims::*;
pub use token_codec::*;
