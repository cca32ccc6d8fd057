//! Tokens module - cached lookups, search and listings.

mod listing;
mod tokens_model;
mod tokens_service;
mod tokens_traits;


pub use listing::{paginate, search_records};
pub use tokens_model::{ListQuery, SortField, TokenPage};
pub use tokens_service::TokenService;
pub use tokens_traits::TokenServiceTrait;
