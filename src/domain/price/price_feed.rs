//! Price feed interface

use async_trait::async_trait;

use super::PriceQuote;
use crate::shared::errors::FetchError;

/// Source of the current quote for the tracked asset.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the current USD price and 24h change.
    async fn fetch_quote(&self) -> Result<PriceQuote, FetchError>;

    /// Check that the upstream API answers at all.
    async fn is_available(&self) -> bool {
        self.fetch_quote().await.is_ok()
    }
}
