//! Common types used across the application

use serde::Serialize;

/// Tracked asset as known to the price API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// CoinGecko coin id
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

/// The only asset this ticker follows.
pub const BITCOIN: Asset = Asset {
    id: "bitcoin",
    symbol: "BTC",
    name: "Bitcoin",
};

/// Quote currency, as spelled in the API query and response keys.
pub const QUOTE_CURRENCY: &str = "usd";
