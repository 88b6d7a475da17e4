//! Error handling for the application

use thiserror::Error;

/// Failure of a single price poll.
///
/// The monitor collapses every variant into one user-facing message; the variants
/// only exist so the cause can be logged.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Price API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid price payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Price payload missing field `{0}`")]
    MissingField(&'static str),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Price API unavailable: {0}")]
    Unavailable(String),
}
