//! Render node produced for the host's layout tree.
//!
//! The node is a stateless projection of the surface: root class list,
//! hidden styling, projected size and the embedded map element.

use serde::Serialize;
use smallvec::SmallVec;

use crate::config::{InsetSize, MapConfig};

/// Class every inset root carries.
pub const ROOT_CLASS: &str = "map-inset";

/// The embedded map element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    /// Map element identifier.
    pub id: String,
    /// Map clock update frequency in Hz.
    pub update_frequency_hz: u32,
    /// Traffic data update frequency in Hz.
    pub data_update_frequency_hz: u32,
}

impl From<&MapConfig> for MapNode {
    fn from(config: &MapConfig) -> Self {
        Self {
            id: config.id.clone(),
            update_frequency_hz: config.update_frequency_hz,
            data_update_frequency_hz: config.data_update_frequency_hz,
        }
    }
}

/// The inset's visual node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsetNode {
    /// Root element classes, [`ROOT_CLASS`] first.
    pub classes: SmallVec<[String; 2]>,
    /// Whether `display: none` styling is applied.
    pub hidden: bool,
    /// Projected width in pixels.
    pub width: u32,
    /// Projected height in pixels.
    pub height: u32,
    /// Embedded map element.
    pub map: MapNode,
}

impl InsetNode {
    /// Whether the node is displayed.
    #[must_use]
    pub const fn is_visible(&self) -> bool { !self.hidden }

    /// Whether the root carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool { self.classes.iter().any(|c| c == class) }

    /// Projected size of the node.
    #[must_use]
    pub const fn size(&self) -> InsetSize { InsetSize::new(self.width, self.height) }

    /// Renders the node as an HTML-like tag, mainly for logs and the CLI.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let style = if self.hidden { " style=\"display: none\"" } else { "" };
        format!(
            "<div class=\"{}\"{style}><map id=\"{}\" width=\"{}\" height=\"{}\" /></div>",
            self.classes.join(" "),
            self.map.id,
            self.width,
            self.height,
        )
    }
}
