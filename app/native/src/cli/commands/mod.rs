//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `replay` - Scenario replay

use clap::{Parser, Subcommand};

use crate::error::OverlayError;
use crate::{config, schema};

pub mod config_cmd;
pub mod replay;

pub use config_cmd::ConfigCommands;
pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// PFD traffic map inset overlay tooling.
#[derive(Parser, Debug)]
#[command(name = "pfd-traffic-map")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a scenario of timed stream events.
    ///
    /// Drives a real overlay with the default render surface and prints the
    /// render node after every step.
    Replay(ReplayArgs),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Configuration file management commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(std::path::PathBuf::from)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), OverlayError> {
        if let Some(path_buf) = self.config_path() {
            if !path_buf.exists() {
                return Err(OverlayError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path_buf.display()
                )));
            }
            config::set_custom_config_path(path_buf);
        }

        match &self.command {
            Commands::Replay(args) => replay::execute(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }
        }
    }
}
