//! Layout adapter state machine.
//!
//! Decides which [`SizePreset`] the inset should settle on given the screen
//! mode and the companion display's power state. The adapter is pure: it
//! never sleeps and never touches the surface. Each transition request comes
//! back as a [`ScheduledTransition`] which the caller arms as a timer; when
//! the timer fires the caller hands the token back to [`LayoutAdapter::on_settled`].
//!
//! # Transitions
//!
//! | Event                          | Powered | Result                                   |
//! |--------------------------------|---------|------------------------------------------|
//! | screen → reversionary          | yes     | schedule `Expanded`                      |
//! | screen → reversionary          | no      | schedule `Expanded`, arm power-on waiter |
//! | screen → any other mode        | yes     | schedule `Compact`                       |
//! | screen → any other mode        | no      | arm power-on waiter if heading `Expanded`|
//! | companion power on, waiter set | -       | consume waiter, schedule `Compact`       |
//!
//! # Superseding
//!
//! Every request gets a fresh token. Only the latest pending token commits,
//! so a transition that was overtaken inside the settle window is dropped.

use std::time::Duration;

use serde::Serialize;

use super::types::{ScreenMode, ScreenStateEvent, SizePreset};

/// A transition waiting for its settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransition {
    /// Token identifying this request.
    pub token: u64,
    /// Preset to commit once settled.
    pub target: SizePreset,
}

/// A transition the caller must arm a timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTransition {
    /// Token to hand back to [`LayoutAdapter::on_settled`].
    pub token: u64,
    /// Preset the transition commits.
    pub target: SizePreset,
    /// How long to wait before handing the token back.
    pub delay: Duration,
}

/// One-shot listener for the companion display coming up.
///
/// Lives in an `Option`; firing takes it out, so it can fire at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOnWaiter {
    /// Latest layout token when the waiter was armed.
    pub armed_by: u64,
}

impl PowerOnWaiter {
    /// Consumes the waiter if `powered` is the notification it waits for.
    fn fire(slot: &mut Option<Self>, powered: bool) -> Option<Self> {
        if powered { slot.take() } else { None }
    }
}

/// Screen mode and power driven size state machine.
#[derive(Debug, Clone)]
pub struct LayoutAdapter {
    mode: ScreenMode,
    companion_powered: bool,
    power_waiter: Option<PowerOnWaiter>,
    pending: Option<PendingTransition>,
    active: SizePreset,
    next_token: u64,
    settle_delay: Duration,
}

impl LayoutAdapter {
    /// Creates an adapter in normal mode, companion unpowered, compact preset.
    #[must_use]
    pub const fn new(settle_delay: Duration) -> Self {
        Self {
            mode: ScreenMode::Normal,
            companion_powered: false,
            power_waiter: None,
            pending: None,
            active: SizePreset::Compact,
            next_token: 1,
            settle_delay,
        }
    }

    /// Last raw screen mode seen.
    #[must_use]
    pub const fn mode(&self) -> ScreenMode { self.mode }

    /// Last companion power notification (`false` until the first one).
    #[must_use]
    pub const fn companion_powered(&self) -> bool { self.companion_powered }

    /// The committed preset.
    #[must_use]
    pub const fn active(&self) -> SizePreset { self.active }

    /// The transition waiting to settle, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingTransition> { self.pending }

    /// Whether the power-on waiter is armed.
    #[must_use]
    pub const fn is_waiting_for_power(&self) -> bool { self.power_waiter.is_some() }

    /// Handles a screen state notification.
    pub fn on_screen_state(&mut self, event: ScreenStateEvent) -> Option<ScheduledTransition> {
        self.mode = event.current;

        if event.current.is_reversionary() {
            let scheduled = self.schedule(SizePreset::Expanded);
            if !self.companion_powered && self.power_waiter.is_none() {
                self.power_waiter = Some(PowerOnWaiter { armed_by: scheduled.token });
                tracing::debug!(token = scheduled.token, "overlay: waiting for companion power-on");
            }
            return Some(scheduled);
        }

        if self.companion_powered {
            return Some(self.schedule(SizePreset::Compact));
        }

        if self.target() == SizePreset::Expanded && self.power_waiter.is_none() {
            let armed_by = self.pending.map_or(self.next_token - 1, |pending| pending.token);
            self.power_waiter = Some(PowerOnWaiter { armed_by });
        }

        tracing::debug!(
            mode = ?event.current,
            waiting = self.power_waiter.is_some(),
            "overlay: companion unpowered, deferring compact layout"
        );
        None
    }

    /// Handles a companion power notification.
    pub fn on_companion_power(&mut self, powered: bool) -> Option<ScheduledTransition> {
        self.companion_powered = powered;

        let waiter = PowerOnWaiter::fire(&mut self.power_waiter, powered)?;
        tracing::debug!(armed_by = waiter.armed_by, "overlay: companion powered, reverting layout");
        Some(self.schedule(SizePreset::Compact))
    }

    /// Handles a settle timer expiry.
    ///
    /// Returns the preset to commit, or `None` if the token was superseded.
    pub fn on_settled(&mut self, token: u64) -> Option<SizePreset> {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.active = pending.target;
                tracing::info!(token, preset = %pending.target, "overlay: layout transition settled");
                Some(pending.target)
            }
            _ => {
                tracing::debug!(
                    token,
                    latest = ?self.pending.map(|p| p.token),
                    "overlay: ignoring superseded layout transition"
                );
                None
            }
        }
    }

    /// Preset the inset is heading to: the pending target, else the active one.
    fn target(&self) -> SizePreset { self.pending.map_or(self.active, |pending| pending.target) }

    fn schedule(&mut self, target: SizePreset) -> ScheduledTransition {
        let token = self.next_token;
        self.next_token += 1;

        if let Some(previous) = self.pending.replace(PendingTransition { token, target }) {
            tracing::debug!(
                superseded = previous.token,
                token,
                "overlay: layout transition superseded before settling"
            );
        }

        ScheduledTransition {
            token,
            target,
            delay: self.settle_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn reversionary() -> ScreenStateEvent { ScreenStateEvent::to(ScreenMode::Reversionary) }

    fn normal() -> ScreenStateEvent { ScreenStateEvent::to(ScreenMode::Normal) }

    #[test]
    fn test_initial_state() {
        let adapter = LayoutAdapter::new(DELAY);
        assert_eq!(adapter.active(), SizePreset::Compact);
        assert_eq!(adapter.mode(), ScreenMode::Normal);
        assert!(!adapter.companion_powered());
        assert!(adapter.pending().is_none());
        assert!(!adapter.is_waiting_for_power());
    }

    #[test]
    fn test_reversionary_unpowered_expands_then_power_reverts() {
        let mut adapter = LayoutAdapter::new(DELAY);

        let expand = adapter.on_screen_state(reversionary()).unwrap();
        assert_eq!(expand.target, SizePreset::Expanded);
        assert_eq!(expand.delay, DELAY);
        assert!(adapter.is_waiting_for_power());

        // Not settled yet: active preset still compact
        assert_eq!(adapter.active(), SizePreset::Compact);
        assert_eq!(adapter.on_settled(expand.token), Some(SizePreset::Expanded));
        assert_eq!(adapter.active(), SizePreset::Expanded);

        let revert = adapter.on_companion_power(true).unwrap();
        assert_eq!(revert.target, SizePreset::Compact);
        assert!(!adapter.is_waiting_for_power());
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
        assert_eq!(adapter.active(), SizePreset::Compact);
    }

    #[test]
    fn test_power_waiter_fires_once() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_screen_state(reversionary());

        assert!(adapter.on_companion_power(true).is_some());
        assert!(adapter.on_companion_power(true).is_none());
        assert!(adapter.on_companion_power(false).is_none());
        assert!(adapter.on_companion_power(true).is_none());
    }

    #[test]
    fn test_power_off_does_not_fire_waiter() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_screen_state(reversionary());

        assert!(adapter.on_companion_power(false).is_none());
        assert!(adapter.is_waiting_for_power());
    }

    #[test]
    fn test_reversionary_powered_does_not_arm_waiter() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);

        let expand = adapter.on_screen_state(reversionary()).unwrap();
        assert_eq!(expand.target, SizePreset::Expanded);
        assert!(!adapter.is_waiting_for_power());
    }

    #[test]
    fn test_normal_while_powered_reverts() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        adapter.on_settled(expand.token);

        let revert = adapter.on_screen_state(normal()).unwrap();
        assert_eq!(revert.target, SizePreset::Compact);
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
    }

    #[test]
    fn test_normal_while_unpowered_defers_to_power_on() {
        let mut adapter = LayoutAdapter::new(DELAY);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        adapter.on_settled(expand.token);

        assert!(adapter.on_screen_state(normal()).is_none());
        assert_eq!(adapter.active(), SizePreset::Expanded);
        assert!(adapter.is_waiting_for_power());

        let revert = adapter.on_companion_power(true).unwrap();
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
    }

    #[test]
    fn test_power_lost_while_expanded_reverts_on_next_power_on() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        assert!(!adapter.is_waiting_for_power());
        adapter.on_settled(expand.token);

        adapter.on_companion_power(false);
        assert!(adapter.on_screen_state(normal()).is_none());
        assert_eq!(adapter.active(), SizePreset::Expanded);
        assert!(adapter.is_waiting_for_power());

        let revert = adapter.on_companion_power(true).unwrap();
        assert_eq!(revert.target, SizePreset::Compact);
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
        assert_eq!(adapter.mode(), ScreenMode::Normal);
        assert!(!adapter.is_waiting_for_power());
    }

    #[test]
    fn test_power_lost_while_expand_pending_reverts_on_next_power_on() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        adapter.on_companion_power(false);
        assert!(adapter.on_screen_state(normal()).is_none());
        assert!(adapter.is_waiting_for_power());

        // The expansion still lands, then power-on brings it back
        assert_eq!(adapter.on_settled(expand.token), Some(SizePreset::Expanded));
        let revert = adapter.on_companion_power(true).unwrap();
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
    }

    #[test]
    fn test_normal_while_unpowered_without_waiter_is_noop() {
        let mut adapter = LayoutAdapter::new(DELAY);
        assert!(adapter.on_screen_state(normal()).is_none());
        assert!(adapter.on_companion_power(true).is_none());
        assert_eq!(adapter.active(), SizePreset::Compact);
    }

    #[test]
    fn test_non_reversionary_modes_behave_as_normal() {
        for mode in [ScreenMode::Off, ScreenMode::Init, ScreenMode::WaitingValidation, ScreenMode::Unknown] {
            let mut adapter = LayoutAdapter::new(DELAY);
            adapter.on_companion_power(true);
            let scheduled = adapter.on_screen_state(ScreenStateEvent::to(mode)).unwrap();
            assert_eq!(scheduled.target, SizePreset::Compact, "{mode:?}");
        }
    }

    #[test]
    fn test_superseded_transition_is_ignored() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);

        let expand = adapter.on_screen_state(reversionary()).unwrap();
        let revert = adapter.on_screen_state(normal()).unwrap();
        assert!(revert.token > expand.token);

        // Stale timer fires first and must not win
        assert_eq!(adapter.on_settled(expand.token), None);
        assert_eq!(adapter.active(), SizePreset::Compact);

        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
    }

    #[test]
    fn test_flapping_settles_on_latest_request() {
        let mut adapter = LayoutAdapter::new(DELAY);
        adapter.on_companion_power(true);

        let mut tokens = Vec::new();
        for i in 0..6 {
            let event = if i % 2 == 0 { reversionary() } else { normal() };
            tokens.push(adapter.on_screen_state(event).unwrap());
        }
        let last = *tokens.last().unwrap();

        let committed: Vec<_> = tokens.iter().filter_map(|t| adapter.on_settled(t.token)).collect();
        assert_eq!(committed, vec![last.target]);
        assert_eq!(adapter.active(), SizePreset::Compact);
        assert!(adapter.pending().is_none());
    }

    #[test]
    fn test_repeated_reversionary_rearms_single_waiter() {
        let mut adapter = LayoutAdapter::new(DELAY);
        let first = adapter.on_screen_state(reversionary()).unwrap();
        let second = adapter.on_screen_state(reversionary()).unwrap();

        assert_eq!(adapter.on_settled(first.token), None);
        assert_eq!(adapter.on_settled(second.token), Some(SizePreset::Expanded));

        // Only one waiter: one power-on yields exactly one revert
        assert!(adapter.on_companion_power(true).is_some());
        assert!(adapter.on_companion_power(true).is_none());
    }

    #[test]
    fn test_power_on_before_expand_settles_supersedes_it() {
        let mut adapter = LayoutAdapter::new(DELAY);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        let revert = adapter.on_companion_power(true).unwrap();

        assert_eq!(adapter.on_settled(expand.token), None);
        assert_eq!(adapter.on_settled(revert.token), Some(SizePreset::Compact));
        assert_eq!(adapter.active(), SizePreset::Compact);
    }

    #[test]
    fn test_settled_twice_commits_once() {
        let mut adapter = LayoutAdapter::new(DELAY);
        let expand = adapter.on_screen_state(reversionary()).unwrap();
        assert!(adapter.on_settled(expand.token).is_some());
        assert!(adapter.on_settled(expand.token).is_none());
    }
}
