//! CLI module for the traffic map overlay.
//!
//! This module provides command-line tooling around the overlay: replaying
//! event scenarios, printing the configuration schema and managing the
//! configuration file.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::OverlayError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), OverlayError> {
    let cli = Cli::parse();
    cli.execute()
}
