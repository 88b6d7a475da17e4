use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::price::{PriceFeed, PriceQuote};
use crate::shared::errors::FetchError;
use crate::shared::types::{BITCOIN, QUOTE_CURRENCY};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// `simple/price` response for `ids=bitcoin&vs_currencies=usd&include_24hr_change=true`
#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<CoinQuote>,
}

#[derive(Debug, Deserialize)]
struct CoinQuote {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// Settings for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Unset means the transport's own behaviour applies.
    pub timeout: Option<Duration>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// CoinGecko price API client
pub struct CoinGeckoClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    pub fn price_url(&self) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            self.base_url, BITCOIN.id, QUOTE_CURRENCY
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http_client.get(url);
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

/// Pull the bitcoin quote out of a `simple/price` body.
pub fn parse_simple_price(body: &str) -> Result<PriceQuote, FetchError> {
    let response: SimplePriceResponse = serde_json::from_str(body)?;
    let coin = response.bitcoin.ok_or(FetchError::MissingField("bitcoin"))?;

    Ok(PriceQuote {
        price: coin.usd.ok_or(FetchError::MissingField("bitcoin.usd"))?,
        change_24h: coin
            .usd_24h_change
            .ok_or(FetchError::MissingField("bitcoin.usd_24h_change"))?,
    })
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn fetch_quote(&self) -> Result<PriceQuote, FetchError> {
        let url = self.price_url();
        debug!("🔍 Fetching {} price from: {}", BITCOIN.symbol, url);

        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_simple_price(&body)
    }

    async fn is_available(&self) -> bool {
        match self.get(&format!("{}/ping", self.base_url)).send().await {
            Ok(response) => {
                let is_available = response.status().is_success();
                if is_available {
                    info!("✅ CoinGecko API is available");
                } else {
                    warn!("⚠️ CoinGecko API returned status: {}", response.status());
                }
                is_available
            }
            Err(e) => {
                warn!("⚠️ CoinGecko API is not available: {}", e);
                false
            }
        }
    }
}
