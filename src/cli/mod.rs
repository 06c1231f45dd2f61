//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tombola using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tombola - sheet batch generation and export engine
#[derive(Parser, Debug)]
#[command(name = "tombola")]
#[command(version, about, long_about = None)]
#[command(author = "Tombola Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tombola.toml", env = "TOMBOLA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TOMBOLA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Populate the active generation with sheets, creating it if needed
    Generate(commands::generate::GenerateArgs),

    /// Discard all sheets and start a fresh generation
    Regenerate(commands::regenerate::RegenerateArgs),

    /// Export a generation's sheets into a ZIP archive
    Export(commands::export::ExportArgs),

    /// Show the active generation and its stock
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from(["tombola", "generate"]);
        assert_eq!(cli.config, "tombola.toml");
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["tombola", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["tombola", "--log-level", "debug", "generate"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from(["tombola", "export", "--mark-sold"]);
        match cli.command {
            Commands::Export(args) => assert!(args.mark_sold),
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["tombola", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["tombola", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
