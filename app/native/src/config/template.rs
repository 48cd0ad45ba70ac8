//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// This creates a JSONC file documenting every option with its default value.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// PFD Traffic Map Configuration File
// ==================================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Layout Transitions
  // ============================================================================
  // Delay in milliseconds before a size change is committed after a screen
  // mode or companion power change. Models the display settle time.
  // "settleDelayMs": 1000,

  // Inset size while the screen is in normal mode
  // "compact": { "width": 242, "height": 230 },

  // Inset size while the screen is in reversionary mode
  // "expanded": { "width": 312, "height": 230 },

  // Style class added to the inset while it is expanded
  // "reversionaryClass": "reversionary",

  // ============================================================================
  // Range Knob
  // ============================================================================
  // "rangeEvents": {
  //   // Interaction event that increases the map range
  //   "increment": "AS1000_PFD_RANGE_INC",
  //
  //   // Interaction event that decreases the map range
  //   "decrement": "AS1000_PFD_RANGE_DEC"
  // },

  // ============================================================================
  // Embedded Map
  // ============================================================================
  // "map": {
  //   // Identifier of the compiled map element
  //   "id": "pfd-trafficmap",
  //
  //   // Map clock update frequency in Hz
  //   "updateFrequencyHz": 30,
  //
  //   // Traffic data update frequency in Hz
  //   "dataUpdateFrequencyHz": 4,
  //
  //   // Number of discrete range steps and the starting step
  //   "rangeSteps": 12,
  //   "initialRangeIndex": 3
  // }
}
"#
    .to_string()
}

/// Writes the configuration template to the given path.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn create_config_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
