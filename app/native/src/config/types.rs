//! Configuration types for the traffic map overlay.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A fixed `(width, height)` pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsetSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl InsetSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }
}

impl std::fmt::Display for InsetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Interaction event codes that drive the map range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeEventConfig {
    /// Event code that steps the range up one index.
    /// Default: "`AS1000_PFD_RANGE_INC`"
    pub increment: String,

    /// Event code that steps the range down one index.
    /// Default: "`AS1000_PFD_RANGE_DEC`"
    pub decrement: String,
}

impl Default for RangeEventConfig {
    fn default() -> Self {
        Self {
            increment: "AS1000_PFD_RANGE_INC".to_string(),
            decrement: "AS1000_PFD_RANGE_DEC".to_string(),
        }
    }
}

/// Settings handed to the embedded map element.
///
/// The overlay does not render the map itself; these values are carried on
/// the render node so the map engine can pick them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Identifier of the compiled map element.
    /// Default: "pfd-trafficmap"
    pub id: String,

    /// Map clock update frequency in Hz.
    /// Default: 30
    pub update_frequency_hz: u32,

    /// Traffic data update frequency in Hz.
    /// Default: 4
    pub data_update_frequency_hz: u32,

    /// Number of discrete range steps the map offers.
    /// Default: 12
    pub range_steps: u32,

    /// Range index the map starts at.
    /// Default: 3
    pub initial_range_index: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            id: "pfd-trafficmap".to_string(),
            update_frequency_hz: 30,
            data_update_frequency_hz: 4,
            range_steps: 12,
            initial_range_index: 3,
        }
    }
}

/// Root configuration for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Delay in milliseconds before a size transition is committed.
    /// Models the display/backlight settle time.
    /// Default: 1000
    pub settle_delay_ms: u64,

    /// Inset size in normal screen mode.
    /// Default: 242x230
    pub compact: InsetSize,

    /// Inset size in reversionary screen mode.
    /// Default: 312x230
    pub expanded: InsetSize,

    /// Style class applied to the inset while expanded.
    /// Default: "reversionary"
    pub reversionary_class: String,

    /// Range knob event codes.
    pub range_events: RangeEventConfig,

    /// Embedded map element settings.
    pub map: MapConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000,
            compact: InsetSize::new(242, 230),
            expanded: InsetSize::new(312, 230),
            reversionary_class: "reversionary".to_string(),
            range_events: RangeEventConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Returns the settle delay as a `Duration`.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration { Duration::from_millis(self.settle_delay_ms) }

    /// Checks the configuration for values the overlay cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [("compact", self.compact), ("expanded", self.expanded)] {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} size must be non-zero, got {size}"
                )));
            }
        }

        if self.reversionary_class.trim().is_empty() {
            return Err(ConfigError::Invalid("reversionaryClass must not be empty".to_string()));
        }

        let codes = &self.range_events;
        if codes.increment.is_empty() || codes.decrement.is_empty() {
            return Err(ConfigError::Invalid("range event codes must not be empty".to_string()));
        }
        if codes.increment == codes.decrement {
            return Err(ConfigError::Invalid(format!(
                "range increment and decrement share the code '{}'",
                codes.increment
            )));
        }

        if self.map.update_frequency_hz == 0 || self.map.data_update_frequency_hz == 0 {
            return Err(ConfigError::Invalid("map update frequencies must be non-zero".to_string()));
        }
        if self.map.range_steps == 0 {
            return Err(ConfigError::Invalid("map.rangeSteps must be non-zero".to_string()));
        }
        if self.map.initial_range_index >= self.map.range_steps {
            return Err(ConfigError::Invalid(format!(
                "map.initialRangeIndex {} is outside 0..{}",
                self.map.initial_range_index, self.map.range_steps
            )));
        }

        Ok(())
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/pfd-traffic-map/config.jsonc \
         or ~/.config/pfd-traffic-map/config.json"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The configuration parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Directory name used under the user's config directory.
pub const APP_DIR_NAME: &str = "pfd-traffic-map";

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/pfd-traffic-map/` (if set)
/// 2. `~/.config/pfd-traffic-map/`
/// 3. The platform config directory reported by `dirs`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join(APP_DIR_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join(APP_DIR_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join(APP_DIR_NAME));
    }

    dirs_to_check.dedup();

    dirs_to_check
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

/// Loads the configuration from the first existing file in `config_paths()`.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
/// Returns `ConfigError::Invalid` if the configuration fails validation.
pub fn load_config() -> Result<(OverlayConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or any of the
/// read, parse and validation errors of [`load_config`].
pub fn load_config_from_path(path: &Path) -> Result<(OverlayConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: OverlayConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    Ok((config, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_matches_inset_sizes() {
        let config = OverlayConfig::default();
        assert_eq!(config.compact, InsetSize::new(242, 230));
        assert_eq!(config.expanded, InsetSize::new(312, 230));
        assert_eq!(config.settle_delay(), Duration::from_millis(1000));
        assert_eq!(config.reversionary_class, "reversionary");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let config = OverlayConfig {
            expanded: InsetSize::new(0, 230),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("expanded"));
    }

    #[test]
    fn test_validate_rejects_shared_range_code() {
        let config = OverlayConfig {
            range_events: RangeEventConfig {
                increment: "KNOB".to_string(),
                decrement: "KNOB".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_initial_range_out_of_bounds() {
        let mut config = OverlayConfig::default();
        config.map.initial_range_index = config.map.range_steps;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_blank_class() {
        let config = OverlayConfig {
            reversionary_class: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "settleDelayMs": 250 }"#;
        let config: OverlayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.compact, InsetSize::new(242, 230));
        assert_eq!(config.range_events.increment, "AS1000_PFD_RANGE_INC");
        assert_eq!(config.map.id, "pfd-trafficmap");
    }

    #[test]
    fn test_load_config_from_path_with_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // shorter settle time for testing
                "settleDelayMs": 50,
                /* larger reversionary inset */
                "expanded": {{ "width": 400, "height": 240 }}
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.settle_delay_ms, 50);
        assert_eq!(config.expanded, InsetSize::new(400, 240));
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("missing.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "compact": {{ "width": 0, "height": 230 }} }}"#).unwrap();
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_paths_prefer_jsonc() {
        let paths = config_paths();
        if let Some(first) = paths.first() {
            assert!(first.ends_with("config.jsonc"));
        }
        assert!(paths.iter().all(|p| p.to_string_lossy().contains(APP_DIR_NAME)));
    }

    #[test]
    fn test_config_error_not_found_message() {
        let msg = ConfigError::NotFound.to_string();
        assert!(msg.contains("No configuration file found"));
    }
}
