use async_trait::async_trait;

use dexfeed_market_data::TokenRecord;

use super::tokens_model::{ListQuery, TokenPage};
use crate::errors::Result;

#[async_trait]
pub trait TokenServiceTrait: Send + Sync {
    /// Canonical record for `address`: cache first, providers on miss.
    ///
    /// `Ok(None)` means no provider knows the token. Fails only with
    /// `Error::InvalidInput` for a blank address.
    async fn get_record(&self, address: &str) -> Result<Option<TokenRecord>>;

    /// Cached tokens whose address or name contains `query`.
    async fn search(&self, query: &str) -> Result<Vec<TokenRecord>>;

    /// Sorted, filtered, cursor-paginated cached tokens.
    async fn list(&self, query: &ListQuery) -> Result<TokenPage>;

    /// The last discovered token universe.
    async fn universe(&self) -> Result<Vec<TokenRecord>>;
}
