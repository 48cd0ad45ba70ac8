//! Event bus feeding the overlay.
//!
//! Each consumed stream is an explicit channel:
//! - map layout setting: an [`eyeball::SharedObservable`], so a new subscriber
//!   sees the current value right away and then every actual change
//! - screen state, companion power and interaction events: `tokio` broadcast
//!   channels
//!
//! The bus is the publishing side. [`EventBus::streams`] hands out the
//! subscribing side, which the overlay controller takes ownership of.

use eyeball::{SharedObservable, Subscriber};
use tokio::sync::broadcast;

use super::types::{LayoutSetting, ScreenStateEvent};
use crate::events;

/// Capacity of each broadcast stream.
const BROADCAST_CAPACITY: usize = 64;

/// Publishing side of the overlay's input streams.
pub struct EventBus {
    layout: SharedObservable<LayoutSetting>,
    screen_state: broadcast::Sender<ScreenStateEvent>,
    companion_power: broadcast::Sender<bool>,
    interaction: broadcast::Sender<String>,
}

impl Default for EventBus {
    fn default() -> Self { Self::new() }
}

impl EventBus {
    /// Creates a bus with the layout setting `Off`.
    #[must_use]
    pub fn new() -> Self { Self::with_layout(LayoutSetting::Off) }

    /// Creates a bus with the given initial layout setting.
    #[must_use]
    pub fn with_layout(initial: LayoutSetting) -> Self {
        let (screen_state, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (companion_power, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (interaction, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            layout: SharedObservable::new(initial),
            screen_state,
            companion_power,
            interaction,
        }
    }

    /// Subscribes to every stream.
    ///
    /// Broadcast receivers only see events published after this call.
    #[must_use]
    pub fn streams(&self) -> OverlayStreams {
        OverlayStreams {
            layout: self.layout.subscribe(),
            screen_state: self.screen_state.subscribe(),
            companion_power: self.companion_power.subscribe(),
            interaction: self.interaction.subscribe(),
        }
    }

    // ========================================================================
    // Map layout setting
    // ========================================================================

    /// Current map layout setting.
    #[must_use]
    pub fn map_layout(&self) -> LayoutSetting { self.layout.get() }

    /// Sets the map layout. Subscribers are only notified on an actual change.
    pub fn set_map_layout(&self, setting: LayoutSetting) {
        if self.layout.set_if_not_eq(setting).is_some() {
            tracing::trace!(topic = events::settings::MAP_LAYOUT, ?setting, "overlay: published");
        }
    }

    /// Toggles between the traffic map and no map.
    ///
    /// Returns the new setting.
    pub fn toggle_traffic_map(&self) -> LayoutSetting {
        let next = if self.map_layout().shows_traffic() {
            LayoutSetting::Off
        } else {
            LayoutSetting::Tfc
        };
        self.set_map_layout(next);
        next
    }

    /// Selects the traffic map layout.
    pub fn select_traffic_map(&self) { self.set_map_layout(LayoutSetting::Tfc); }

    // ========================================================================
    // Broadcast streams
    // ========================================================================

    /// Publishes a screen state change. Returns the number of receivers.
    pub fn publish_screen_state(&self, event: ScreenStateEvent) -> usize {
        tracing::trace!(topic = events::instrument::SCREEN_STATE, ?event, "overlay: published");
        self.screen_state.send(event).unwrap_or(0)
    }

    /// Publishes a companion power notification. Returns the number of receivers.
    pub fn publish_companion_power(&self, powered: bool) -> usize {
        tracing::trace!(topic = events::mfd::POWER_ON, powered, "overlay: published");
        self.companion_power.send(powered).unwrap_or(0)
    }

    /// Publishes an interaction event code. Returns the number of receivers.
    pub fn publish_interaction(&self, code: impl Into<String>) -> usize {
        let code = code.into();
        tracing::trace!(topic = events::input::H_EVENT, code = %code, "overlay: published");
        self.interaction.send(code).unwrap_or(0)
    }
}

/// Subscribing side of the overlay's input streams.
pub struct OverlayStreams {
    /// Map layout setting.
    pub layout: Subscriber<LayoutSetting>,
    /// Screen state changes.
    pub screen_state: broadcast::Receiver<ScreenStateEvent>,
    /// Companion power notifications.
    pub companion_power: broadcast::Receiver<bool>,
    /// Interaction event codes.
    pub interaction: broadcast::Receiver<String>,
}
