//! CLI module for the travel gateway
//!
//! Provides command-line interface for:
//! - serve: Load configuration and seed data, then serve HTTP
//! - print-config: Show the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_state, build_store, print_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
