//! btcwatch - Bitcoin price ticker
//! Polls the CoinGecko price API and keeps a three-way display state current

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::price::{DisplayState, PriceFeed, PriceMonitor, PriceSnapshot};
pub use infrastructure::CoinGeckoClient;
