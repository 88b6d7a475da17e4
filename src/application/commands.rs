//! CLI commands and handlers
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::info;

use crate::app::{self, AppCfg};
use crate::config::Config;
use crate::domain::price::{PriceFeed, PriceSnapshot, FETCH_ERROR_MESSAGE};
use crate::report::{self, PriceReport};
use crate::shared::errors::AppError;

#[derive(Parser, Debug)]
#[command(name = "btcwatch")]
#[command(version, about = "Bitcoin price ticker (USD price and 24h change from CoinGecko)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to config file (optional)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Price API base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// CoinGecko demo API key (overrides config)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log filter, e.g. "info" or "btcwatch=debug" (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Live ticker, refreshed every 60 seconds; type `r` to refresh, `q` to quit
    Watch {
        /// Exit after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Fetch the price once and print it
    Once {
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check that the price API is reachable
    Check,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Watch { duration: None }
    }
}

impl GlobalArgs {
    /// Priority: CLI args > config file > defaults.
    pub fn resolve(self) -> Result<AppCfg> {
        let mut app_cfg = match &self.config {
            Some(path) => AppCfg::from_config(Config::from_file(path)?),
            None => AppCfg::default(),
        };

        if let Some(base_url) = self.base_url {
            app_cfg.base_url = base_url;
        }
        if let Some(api_key) = self.api_key {
            app_cfg.api_key = Some(api_key);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            app_cfg.timeout_secs = Some(timeout_secs);
        }
        if let Some(log_level) = self.log_level {
            app_cfg.log_level = log_level;
        }

        app_cfg.validate()?;
        Ok(app_cfg)
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, app_cfg: AppCfg) -> Result<()> {
        match command {
            Commands::Watch { duration } => {
                app::run(app_cfg, duration.map(Duration::from_secs)).await
            }
            Commands::Once { json } => Self::execute_once_command(json, &app_cfg).await,
            Commands::Check => Self::execute_check_command(&app_cfg).await,
        }
    }

    async fn execute_once_command(json: bool, app_cfg: &AppCfg) -> Result<()> {
        let client = app_cfg.build_client()?;
        let quote = client.fetch_quote().await.context(FETCH_ERROR_MESSAGE)?;
        let snapshot = PriceSnapshot::observed_now(quote);

        if json {
            println!("{}", PriceReport::new(&snapshot).to_json()?);
        } else {
            println!("{}", report::render_snapshot(&snapshot).join("\n"));
        }
        Ok(())
    }

    async fn execute_check_command(app_cfg: &AppCfg) -> Result<()> {
        info!("🔌 Checking {}", app_cfg.base_url);
        let client = app_cfg.build_client()?;

        if !client.is_available().await {
            return Err(AppError::Unavailable(app_cfg.base_url.clone()).into());
        }
        println!("✅ Price API reachable at {}", app_cfg.base_url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_watch() {
        let cli = Cli::try_parse_from(["btcwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.command.unwrap_or_default(), Commands::Watch { duration: None });
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["btcwatch", "once", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Once { json: true }));

        let cli = Cli::try_parse_from(["btcwatch", "watch", "--duration", "30"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Watch { duration: Some(30) }));

        let cli = Cli::try_parse_from(["btcwatch", "check", "--base-url", "http://localhost:9000"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
        assert_eq!(cli.global.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_resolve_cli_overrides_defaults() {
        let args = GlobalArgs {
            base_url: Some("http://localhost:9000/api/v3".to_string()),
            timeout_secs: Some(5),
            log_level: Some("debug".to_string()),
            ..GlobalArgs::default()
        };
        let app_cfg = args.resolve().unwrap();

        assert_eq!(app_cfg.base_url, "http://localhost:9000/api/v3");
        assert_eq!(app_cfg.timeout_secs, Some(5));
        assert_eq!(app_cfg.log_level, "debug");
        assert!(app_cfg.api_key.is_none());
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let args = GlobalArgs {
            base_url: Some("localhost".to_string()),
            ..GlobalArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_resolve_missing_config_file() {
        let args = GlobalArgs {
            config: Some("/nonexistent/btcwatch.toml".to_string()),
            ..GlobalArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
