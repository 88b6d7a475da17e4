//! Application layer - CLI commands

pub mod commands;

pub use commands::{Cli, CommandExecutor, Commands, GlobalArgs};
