//! Observable overlay state.
//!
//! The actor owns the surface and state machines. After every message it
//! publishes a read-only [`OverlaySnapshot`] and the current [`InsetNode`]
//! into [`SharedObservable`]s, so the host can render or watch without a
//! round trip through the actor.

use eyeball::{SharedObservable, Subscriber};
use serde::Serialize;

use super::layout::{LayoutAdapter, PendingTransition};
use super::render::InsetNode;
use super::surface::RenderSurface;
use super::types::{ScreenMode, SizePreset};
use super::visibility::VisibilityGate;
use crate::config::InsetSize;

/// Serializable read-out of the overlay state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    /// Whether the inset is shown.
    pub visible: bool,
    /// Whether the map is updating.
    pub awake: bool,
    /// Committed size preset.
    pub active: SizePreset,
    /// Projected size of the inset.
    pub size: InsetSize,
    /// Transition waiting for its settle delay.
    pub pending: Option<PendingTransition>,
    /// Last screen mode seen.
    pub screen_mode: ScreenMode,
    /// Last companion power notification.
    pub companion_powered: bool,
    /// Whether a power-on waiter is armed.
    pub waiting_for_power: bool,
}

impl OverlaySnapshot {
    /// Captures the state of the given parts.
    #[must_use]
    pub fn capture(
        gate: &VisibilityGate,
        layout: &LayoutAdapter,
        surface: &dyn RenderSurface,
    ) -> Self {
        Self {
            visible: gate.is_visible(),
            awake: surface.is_awake(),
            active: layout.active(),
            size: surface.node().size(),
            pending: layout.pending(),
            screen_mode: layout.mode(),
            companion_powered: layout.companion_powered(),
            waiting_for_power: layout.is_waiting_for_power(),
        }
    }
}

/// Shared, observable copy of the actor's state.
///
/// Cloning yields another handle to the same observables.
#[derive(Clone)]
pub struct OverlayState {
    snapshot: SharedObservable<OverlaySnapshot>,
    node: SharedObservable<InsetNode>,
}

impl OverlayState {
    /// Creates the shared state with initial values.
    #[must_use]
    pub fn new(snapshot: OverlaySnapshot, node: InsetNode) -> Self {
        Self {
            snapshot: SharedObservable::new(snapshot),
            node: SharedObservable::new(node),
        }
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> OverlaySnapshot { self.snapshot.get() }

    /// Latest render node.
    #[must_use]
    pub fn node(&self) -> InsetNode { self.node.get() }

    /// Subscribes to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<OverlaySnapshot> { self.snapshot.subscribe() }

    /// Subscribes to render node changes.
    #[must_use]
    pub fn subscribe_node(&self) -> Subscriber<InsetNode> { self.node.subscribe() }

    /// Publishes new values. Subscribers only wake on an actual change.
    pub fn publish(&self, snapshot: OverlaySnapshot, node: InsetNode) {
        self.snapshot.set_if_not_eq(snapshot);
        self.node.set_if_not_eq(node);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::OverlayConfig;
    use crate::overlay::surface::InsetSurface;

    fn capture_default() -> (OverlaySnapshot, InsetNode) {
        let surface = InsetSurface::new(&OverlayConfig::default());
        let snapshot = OverlaySnapshot::capture(
            &VisibilityGate::new(),
            &LayoutAdapter::new(Duration::from_secs(1)),
            &surface,
        );
        (snapshot, surface.node())
    }

    #[test]
    fn test_capture_initial_state() {
        let (snapshot, _) = capture_default();
        assert!(!snapshot.visible);
        assert!(snapshot.awake);
        assert_eq!(snapshot.active, SizePreset::Compact);
        assert_eq!(snapshot.size, InsetSize::new(242, 230));
        assert!(snapshot.pending.is_none());
        assert!(!snapshot.waiting_for_power);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let (snapshot, _) = capture_default();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["screenMode"], "normal");
        assert_eq!(json["active"], "compact");
        assert_eq!(json["companionPowered"], false);
        assert!(json["pending"].is_null());
    }

    #[test]
    fn test_publish_skips_identical_values() {
        let (snapshot, node) = capture_default();
        let state = OverlayState::new(snapshot.clone(), node.clone());
        let mut subscriber = state.subscribe();

        state.publish(snapshot.clone(), node.clone());
        assert_eq!(subscriber.next_now(), snapshot);

        let changed = OverlaySnapshot { visible: true, ..snapshot };
        state.publish(changed.clone(), node);
        assert_eq!(state.snapshot(), changed);
    }
}
