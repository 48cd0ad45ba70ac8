//! Core value types observed and produced by the overlay.

use serde::{Deserialize, Serialize};

use crate::config::{InsetSize, OverlayConfig};

/// PFD map layout setting, as published on the settings stream.
///
/// Only [`LayoutSetting::Tfc`] makes the inset visible. Values this crate does
/// not know about deserialize to [`LayoutSetting::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutSetting {
    /// No map on the PFD.
    #[default]
    Off,
    /// Navigation map inset.
    Inset,
    /// HSI map.
    Hsi,
    /// Traffic map inset.
    Tfc,
    /// Any value not listed above.
    #[serde(other)]
    Unknown,
}

impl LayoutSetting {
    /// Whether this layout shows the traffic inset.
    #[must_use]
    pub const fn shows_traffic(self) -> bool { matches!(self, Self::Tfc) }
}

impl std::str::FromStr for LayoutSetting {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "OFF" => Self::Off,
            "INSET" => Self::Inset,
            "HSI" => Self::Hsi,
            "TFC" => Self::Tfc,
            _ => Self::Unknown,
        })
    }
}

/// Screen state of the display hosting the inset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenMode {
    /// Display powered off.
    Off,
    /// Display initializing.
    Init,
    /// Display waiting for self-test validation.
    WaitingValidation,
    /// Regular operation.
    #[default]
    Normal,
    /// Degraded mode: this display also presents the companion display's role.
    Reversionary,
    /// Any mode this crate does not know about. Handled like `Normal`.
    #[serde(other)]
    Unknown,
}

impl ScreenMode {
    /// Whether the screen is in reversionary mode.
    #[must_use]
    pub const fn is_reversionary(self) -> bool { matches!(self, Self::Reversionary) }
}

/// A screen state change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenStateEvent {
    /// Mode before the change, when known.
    #[serde(default)]
    pub previous: Option<ScreenMode>,
    /// Mode after the change.
    pub current: ScreenMode,
}

impl ScreenStateEvent {
    /// Creates an event with no known previous mode.
    #[must_use]
    pub const fn to(current: ScreenMode) -> Self { Self { previous: None, current } }
}

/// One of the two inset sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizePreset {
    /// Normal-mode inset.
    #[default]
    Compact,
    /// Reversionary-mode inset.
    Expanded,
}

impl SizePreset {
    /// Resolves the preset to pixel dimensions.
    #[must_use]
    pub const fn size(self, config: &OverlayConfig) -> InsetSize {
        match self {
            Self::Compact => config.compact,
            Self::Expanded => config.expanded,
        }
    }

    /// Whether the reversionary style class belongs with this preset.
    #[must_use]
    pub const fn has_reversionary_class(self) -> bool { matches!(self, Self::Expanded) }
}

impl std::fmt::Display for SizePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Expanded => write!(f, "expanded"),
        }
    }
}

/// A single step of the map range knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeDelta {
    /// `+1` range index.
    Increment,
    /// `-1` range index.
    Decrement,
}

impl RangeDelta {
    /// Signed index change.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}
