//! Configuration module for the traffic map overlay.
//!
//! This module provides configuration types, loading functionality and the
//! commented template used to bootstrap a configuration file.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    APP_DIR_NAME, ConfigError, InsetSize, MapConfig, OverlayConfig, RangeEventConfig,
    config_paths, load_config as load_config_default, load_config_from_path,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<OverlayConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before the first `get_config()` to take effect.
///
/// # Returns
///
/// `true` if the path was set successfully, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk.
///
/// Returns the loaded configuration, or the default configuration if no file
/// exists or loading fails.
fn load_or_default() -> OverlayConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "overlay: configuration loaded");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("overlay: no configuration file found, using defaults");
            OverlayConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "overlay: failed to load configuration, using defaults");
            OverlayConfig::default()
        }
    }
}

/// Returns the global configuration instance, loading it on first use.
///
/// Later calls return the same instance.
pub fn get_config() -> &'static OverlayConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_returns_same_instance() {
        let c1 = get_config();
        let c2 = get_config();
        assert!(std::ptr::eq(c1, c2));
    }

    #[test]
    fn test_global_config_is_valid() {
        assert!(get_config().validate().is_ok());
    }

    #[test]
    fn test_reexported_types_are_available() {
        let config = OverlayConfig::default();
        assert_eq!(config.compact, InsetSize::new(242, 230));
        assert_eq!(config.map, MapConfig::default());
        assert_eq!(config.range_events, RangeEventConfig::default());
    }
}
