// src/app.rs
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::price::{DisplayState, PriceMonitor};
use crate::infrastructure::coingecko_client::DEFAULT_BASE_URL;
use crate::infrastructure::{CoinGeckoClient, CoinGeckoConfig};
use crate::report;
use crate::shared::errors::AppError;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Self {
        let defaults = Self::default();
        Self {
            base_url: cfg.api.base_url.unwrap_or(defaults.base_url),
            api_key: cfg.api.api_key,
            timeout_secs: cfg.api.timeout_secs,
            log_level: cfg.logging.level.unwrap_or(defaults.log_level),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::ConfigError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(AppError::ConfigError("timeout_secs must be positive".to_string()));
        }
        if self.api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
            return Err(AppError::ConfigError("api_key must not be blank".to_string()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn build_client(&self) -> Result<CoinGeckoClient> {
        CoinGeckoClient::new(self.client_config()).context("build HTTP client")
    }
}

/// Keyboard input on the watch screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Refresh,
    Quit,
}

impl UserCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "r" | "refresh" => Some(UserCommand::Refresh),
            "q" | "quit" | "exit" => Some(UserCommand::Quit),
            _ => None,
        }
    }
}

fn draw<W: Write>(out: &mut W, state: &DisplayState) -> io::Result<()> {
    // Clear screen and home the cursor before each redraw.
    writeln!(out, "\x1B[2J\x1B[H{}", report::render(state))?;
    out.flush()
}

/// Interactive ticker: redraw on every state change until quit, ctrl-c or `duration` elapses.
pub async fn run(app_cfg: AppCfg, duration: Option<Duration>) -> Result<()> {
    info!("Starting Bitcoin ticker against {}", app_cfg.base_url);

    let client = app_cfg.build_client()?;
    let monitor = PriceMonitor::new(Arc::new(client));
    let mut updates = monitor.subscribe();
    monitor.start();
    let mut stdout = io::stdout();
    draw(&mut stdout, &updates.borrow_and_update()).context("draw screen")?;

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let deadline = async move {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => futures::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                draw(&mut stdout, &state).context("draw screen")?;
            }
            line = commands.next_line(), if stdin_open => {
                match line.context("read command from stdin")? {
                    Some(input) => match UserCommand::parse(&input) {
                        Some(UserCommand::Refresh) => {
                            info!("Manual refresh requested");
                            monitor.refresh_now();
                        }
                        Some(UserCommand::Quit) => break,
                        None => warn!("Unknown command: {:?}", input.trim()),
                    },
                    None => {
                        debug!("stdin closed, manual refresh unavailable");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut deadline => {
                info!("⏱️ Watch duration elapsed");
                break;
            }
            result = &mut shutdown => {
                result.context("listen for ctrl-c")?;
                break;
            }
        }
    }

    monitor.stop();
    info!("✅ Ticker stopped after {} poll(s)", monitor.polls_issued());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_command_parse() {
        assert_eq!(UserCommand::parse("r"), Some(UserCommand::Refresh));
        assert_eq!(UserCommand::parse("  R \n"), Some(UserCommand::Refresh));
        assert_eq!(UserCommand::parse(""), Some(UserCommand::Refresh));
        assert_eq!(UserCommand::parse("quit"), Some(UserCommand::Quit));
        assert_eq!(UserCommand::parse("q"), Some(UserCommand::Quit));
        assert_eq!(UserCommand::parse("buy"), None);
    }

    #[test]
    fn test_app_cfg_from_config_falls_back_to_defaults() {
        let cfg = Config::parse("[api]\napi_key = \"k\"\n").unwrap();
        let app_cfg = AppCfg::from_config(cfg);

        assert_eq!(app_cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(app_cfg.api_key.as_deref(), Some("k"));
        assert_eq!(app_cfg.log_level, DEFAULT_LOG_LEVEL);
        assert!(app_cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = AppCfg {
            base_url: "ftp://example.com".to_string(),
            ..AppCfg::default()
        };
        assert!(matches!(bad_url.validate(), Err(AppError::ConfigError(_))));

        let zero_timeout = AppCfg {
            timeout_secs: Some(0),
            ..AppCfg::default()
        };
        assert!(zero_timeout.validate().is_err());

        let blank_key = AppCfg {
            api_key: Some("  ".to_string()),
            ..AppCfg::default()
        };
        assert!(blank_key.validate().is_err());
    }

    #[test]
    fn test_client_config_carries_timeout() {
        let app_cfg = AppCfg {
            timeout_secs: Some(7),
            ..AppCfg::default()
        };
        assert_eq!(app_cfg.client_config().timeout, Some(Duration::from_secs(7)));
        assert_eq!(AppCfg::default().client_config().timeout, None);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_draw_writes_screen() {
        let mut out = Vec::new();
        draw(&mut out, &DisplayState::Loading).unwrap();

        let screen = String::from_utf8(out).unwrap();
        assert!(screen.starts_with("\x1B[2J\x1B[H"));
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn test_draw_reports_closed_stdout() {
        let err = draw(&mut ClosedPipe, &DisplayState::Loading).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
