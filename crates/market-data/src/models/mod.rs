//! Market data models
//!
//! This module contains the core data types for token data operations:
//! - `types` - Type aliases for common identifiers (ProviderId, TokenAddress)
//! - `token` - The canonical merged token record (TokenRecord)

mod token;
mod types;

pub use token::TokenRecord;
pub use types::{ProviderId, TokenAddress};
