//! Visibility gate.
//!
//! Maps the PFD map layout setting to shown/hidden and owns the surface's
//! activation state: showing the inset wakes the map, hiding it puts the map
//! to sleep.

use super::surface::RenderSurface;
use super::types::LayoutSetting;

/// Tracks the last applied visibility and drives the surface accordingly.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibilityGate {
    /// Last applied visibility. `None` until the first application.
    visible: Option<bool>,
}

impl VisibilityGate {
    /// Creates a gate that has not applied any state yet.
    #[must_use]
    pub const fn new() -> Self { Self { visible: None } }

    /// Visibility implied by a layout setting.
    #[must_use]
    pub const fn visibility_for(setting: LayoutSetting) -> bool { setting.shows_traffic() }

    /// Whether the inset is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool { self.visible.unwrap_or(false) }

    /// Handles a layout setting notification.
    ///
    /// Returns `true` if the surface changed.
    pub fn on_setting_changed(
        &mut self,
        setting: LayoutSetting,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let visible = Self::visibility_for(setting);
        tracing::debug!(?setting, visible, "overlay: map layout setting changed");
        self.set_visible(visible, surface)
    }

    /// Shows or hides the inset.
    ///
    /// The first call always applies; afterwards only actual transitions touch
    /// the surface. Returns `true` if the surface changed.
    pub fn set_visible(&mut self, visible: bool, surface: &mut dyn RenderSurface) -> bool {
        if self.visible == Some(visible) {
            return false;
        }

        if visible {
            surface.set_hidden(false);
            surface.wake();
        } else {
            surface.set_hidden(true);
            surface.sleep();
        }

        self.visible = Some(visible);
        tracing::info!(visible, "overlay: traffic inset visibility applied");
        true
    }
}
