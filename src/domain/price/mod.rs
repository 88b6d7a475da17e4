//! Price domain - snapshot, display state and the refresh lifecycle

mod price_feed;
mod price_monitor;

pub use price_feed::PriceFeed;
pub use price_monitor::PriceMonitor;

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Fixed cadence of scheduled polls.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(60_000);

/// Message shown for any failed poll; the cause only goes to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch Bitcoin price";

/// Raw quote as returned by a feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub change_24h: f64,
}

/// Direction of the 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Polarity::Positive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

/// Last successfully retrieved observation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    price: f64,
    change_24h: f64,
    observed_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn new(quote: PriceQuote, observed_at: DateTime<Utc>) -> Self {
        Self {
            price: quote.price,
            change_24h: quote.change_24h,
            observed_at,
        }
    }

    /// Stamp a quote with the current wall-clock time.
    pub fn observed_now(quote: PriceQuote) -> Self {
        Self::new(quote, Utc::now())
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn change_24h(&self) -> f64 {
        self.change_24h
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.change_24h)
    }

    /// Same market values, ignoring when they were observed.
    pub fn same_quote(&self, other: &PriceSnapshot) -> bool {
        self.price == other.price && self.change_24h == other.change_24h
    }
}

/// What the screen currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    #[default]
    Loading,
    Error(String),
    Ready(PriceSnapshot),
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn snapshot(&self) -> Option<&PriceSnapshot> {
        match self {
            DisplayState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DisplayState::Error(message) => Some(message),
            _ => None,
        }
    }
}
