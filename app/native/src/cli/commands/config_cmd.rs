//! Config CLI commands.
//!
//! Commands for managing the configuration file.

use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::output::print_highlighted_json;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::OverlayError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Print the configuration template with every option documented.
    Template,

    /// Print the effective configuration.
    ///
    /// Shows the configuration the overlay would run with, after loading the
    /// configuration file (if any) and applying defaults.
    Show {
        /// Output plain JSON instead of highlighted output.
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new configuration file with all options documented.
    #[command(after_long_help = r#"Examples:
  pfd-traffic-map config init              # Create config at default location
  pfd-traffic-map config init --force      # Overwrite existing config
  pfd-traffic-map config init --path ./config.jsonc"#)]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Show the configuration file search paths.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), OverlayError> {
    match cmd {
        ConfigCommands::Template => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Show { json } => show_config(*json),
        ConfigCommands::Init { force, path } => init_config(*force, path.clone()),
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

/// Print the effective configuration.
fn show_config(json: bool) -> Result<(), OverlayError> {
    let value = serde_json::to_value(config::get_config())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match config::get_config_path() {
            Some(path) => println!("# {}", path.display()),
            None => println!("# defaults (no configuration file found)"),
        }
        print_highlighted_json(&value);
    }
    Ok(())
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), OverlayError> {
    let config_path = custom_path.unwrap_or_else(|| {
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(OverlayError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        OverlayError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    Ok(())
}

/// Show the configuration file search paths.
fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'pfd-traffic-map config init' to create one.");
    }
}
