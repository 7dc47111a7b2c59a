//! CLI argument definitions using clap
//!
//! Commands:
//! - travel-gateway serve [--config <path>] [--port <port>] [--seed <path>]
//! - travel-gateway print-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Travel booking REST gateway over an asynchronous document store
#[derive(Parser, Debug)]
#[command(name = "travel-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the seed data and serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the listening port
        #[arg(long)]
        port: Option<u16>,

        /// Override the seed file
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Print the effective configuration as JSON and exit
    PrintConfig {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "travel-gateway",
            "serve",
            "--port",
            "9090",
            "--seed",
            "demos/seed.json",
        ]);
        match cli.command {
            Command::Serve { config, port, seed } => {
                assert!(config.is_none());
                assert_eq!(port, Some(9090));
                assert_eq!(seed, Some(PathBuf::from("demos/seed.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_print_config() {
        let cli = Cli::parse_from(["travel-gateway", "print-config", "--config", "gw.json"]);
        assert!(matches!(
            cli.command,
            Command::PrintConfig { config: Some(ref p) } if p == &PathBuf::from("gw.json")
        ));
    }
}
