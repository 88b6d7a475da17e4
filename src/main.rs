use anyhow::Result;
use clap::Parser;

use btcwatch::application::{Cli, CommandExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_cfg = cli.global.resolve()?;

    tracing_subscriber::fmt()
        .with_env_filter(app_cfg.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    CommandExecutor::execute(cli.command.unwrap_or_default(), app_cfg).await
}
