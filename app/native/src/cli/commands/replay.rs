//! Scenario replay command.

use std::path::PathBuf;

use clap::Args;

use crate::cli::output::{format_bool, print_node, print_step};
use crate::config;
use crate::error::OverlayError;
use crate::scenario::{self, Scenario};

/// Arguments for `replay`.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Scenario format (JSONC):
  {
    "initialLayout": "OFF",
    "steps": [
      { "atMs": 0, "event": { "mapLayout": "TFC" } },
      { "atMs": 100, "event": { "screenState": { "current": "reversionary" } } },
      { "atMs": 1500, "event": { "companionPower": true } },
      { "atMs": 3000, "event": { "interaction": "AS1000_PFD_RANGE_INC" } },
      { "atMs": 3100, "event": "toggleTrafficMap" }
    ]
  }"#)]
pub struct ReplayArgs {
    /// Scenario file to replay.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output the replay report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or the replay fails.
pub fn execute(args: &ReplayArgs) -> Result<(), OverlayError> {
    let scenario = Scenario::load(&args.file)?;
    let config = config::get_config();

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let report = runtime.block_on(scenario::replay(&scenario, config))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for record in &report.steps {
        print_step(record);
    }

    println!();
    println!(
        "final: visible {}  awake {}  preset {}  range index {}",
        format_bool(report.final_snapshot.visible),
        format_bool(report.final_snapshot.awake),
        report.final_snapshot.active,
        report.range_index
    );
    print_node(&report.final_node);
    Ok(())
}
