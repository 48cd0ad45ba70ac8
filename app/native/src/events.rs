//! Centralized topic names for the streams the overlay consumes.
//!
//! Topics are conceptual names, not wire formats. They identify a stream in
//! log output and in scenario files.
//!
//! ## Naming Convention
//!
//! All topics follow the pattern: `pfd://<area>/<topic-name>`
//!
//! - `pfd://` - Prefix identifying this as a PFD bus topic
//! - `<area>` - The subsystem that publishes the topic (e.g., `settings`, `mfd`)
//! - `<topic-name>` - Descriptive kebab-case name for the topic

/// PFD user settings topics.
pub mod settings {
    /// Emitted whenever the PFD map layout setting changes.
    ///
    /// Payload: `LayoutSetting`.
    pub const MAP_LAYOUT: &str = "pfd://settings/map-layout";
}

/// Instrument (screen) topics.
pub mod instrument {
    /// Emitted when the virtual cockpit screen state changes.
    ///
    /// Payload: `{ previous: Option<ScreenMode>, current: ScreenMode }`
    pub const SCREEN_STATE: &str = "pfd://instrument/vc-screen-state";
}

/// Companion display topics.
pub mod mfd {
    /// Emitted when the companion display reports its power state.
    ///
    /// Payload: `bool` - `true` once the display has finished powering up.
    pub const POWER_ON: &str = "pfd://mfd/power-on";
}

/// Raw interaction topics.
pub mod input {
    /// Emitted for each discrete hardware interaction event.
    ///
    /// Payload: `String` - The event code (e.g. `AS1000_PFD_RANGE_INC`).
    pub const H_EVENT: &str = "pfd://input/h-event";
}

/// All topics the overlay subscribes to, in subscription order.
pub const ALL: [&str; 4] =
    [settings::MAP_LAYOUT, instrument::SCREEN_STATE, mfd::POWER_ON, input::H_EVENT];
