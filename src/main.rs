//! travel-gateway CLI entry point
//!
//! Parses arguments, runs the command and exits non-zero on failure. All
//! boot logic lives in the CLI module.

use travel_gateway::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
