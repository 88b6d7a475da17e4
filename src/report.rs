// src/report.rs
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::domain::price::{DisplayState, PriceSnapshot};
use crate::shared::types::{Asset, BITCOIN, QUOTE_CURRENCY};
use crate::shared::utils::{format_percent_change, format_usd};

pub const CONTROLS_HINT: &str = "[r] refresh  [q] quit";

#[derive(Debug, Serialize)]
pub struct PriceReport {
    pub asset: Asset,
    pub currency: &'static str,
    pub price: f64,
    pub change_24h: f64,
    pub polarity: &'static str,
    pub observed_at: DateTime<Utc>,
}

impl PriceReport {
    pub fn new(snapshot: &PriceSnapshot) -> Self {
        Self {
            asset: BITCOIN,
            currency: QUOTE_CURRENCY,
            price: snapshot.price(),
            change_24h: snapshot.change_24h(),
            polarity: snapshot.polarity().as_str(),
            observed_at: snapshot.observed_at(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Text lines for a snapshot, without the controls hint.
pub fn render_snapshot(snapshot: &PriceSnapshot) -> Vec<String> {
    let arrow = if snapshot.polarity().is_positive() { "▲" } else { "▼" };
    let observed_at = snapshot.observed_at().with_timezone(&Local);

    vec![
        format!("{} Price", BITCOIN.name),
        format!("{} {}", format_usd(snapshot.price()), QUOTE_CURRENCY.to_uppercase()),
        format!("{} {}", arrow, format_percent_change(snapshot.change_24h())),
        format!("Last updated: {}", observed_at.format("%H:%M:%S")),
    ]
}

/// Full screen for the current display state.
pub fn render(state: &DisplayState) -> String {
    let mut lines = match state {
        DisplayState::Loading => vec![format!("{} Price", BITCOIN.name), "Loading...".to_string()],
        DisplayState::Error(message) => vec![format!("{} Price", BITCOIN.name), message.clone()],
        DisplayState::Ready(snapshot) => render_snapshot(snapshot),
    };
    lines.push(String::new());
    lines.push(CONTROLS_HINT.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::{PriceQuote, FETCH_ERROR_MESSAGE};
    use chrono::TimeZone;

    fn snapshot(price: f64, change_24h: f64) -> PriceSnapshot {
        let observed_at = Utc.with_ymd_and_hms(2024, 3, 14, 12, 30, 5).unwrap();
        PriceSnapshot::new(PriceQuote { price, change_24h }, observed_at)
    }

    #[test]
    fn test_render_ready_positive() {
        let lines = render_snapshot(&snapshot(1234.5, 0.0));
        assert_eq!(lines[0], "Bitcoin Price");
        assert_eq!(lines[1], "$1,234.50 USD");
        assert_eq!(lines[2], "▲ +0.00%");
        assert!(lines[3].starts_with("Last updated: "));
    }

    #[test]
    fn test_render_ready_negative() {
        let lines = render_snapshot(&snapshot(67000.5, -2.567));
        assert_eq!(lines[1], "$67,000.50 USD");
        assert_eq!(lines[2], "▼ -2.57%");
    }

    #[test]
    fn test_render_offers_refresh_in_every_state() {
        let states = [
            DisplayState::Loading,
            DisplayState::Error(FETCH_ERROR_MESSAGE.to_string()),
            DisplayState::Ready(snapshot(1.0, 1.0)),
        ];
        for state in &states {
            assert!(render(state).ends_with(CONTROLS_HINT));
        }
        assert!(render(&states[0]).contains("Loading..."));
        assert!(render(&states[1]).contains(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_price_report_json() {
        let report = PriceReport::new(&snapshot(67000.5, 3.21));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["asset"]["id"], "bitcoin");
        assert_eq!(json["currency"], "usd");
        assert_eq!(json["price"], 67000.5);
        assert_eq!(json["change_24h"], 3.21);
        assert_eq!(json["polarity"], "positive");
        assert_eq!(json["observed_at"], "2024-03-14T12:30:05Z");
    }
}
