//! Overlay actor module.
//!
//! The overlay actor owns the render surface, the range controller and the
//! three state machines, and processes messages sequentially. Stream
//! notifications, settle-timer expiries and host calls all arrive on the same
//! channel, so no two handlers ever run concurrently.
//!
//! # Settle Timers
//!
//! Layout transitions are committed after a settle delay. The actor arms one
//! `tokio` sleep task per transition; when it elapses the task posts
//! [`OverlayMessage::TransitionSettled`] back through a weak sender, so a
//! pending timer never keeps the actor alive. Arming a new transition aborts
//! the previous timer, and the layout adapter ignores any stale token that
//! was already in flight.
//!
//! # Panic Recovery
//!
//! If a message handler panics, the panic is caught and logged and the actor
//! keeps processing subsequent messages.

mod handle;
mod messages;

use std::panic::{AssertUnwindSafe, catch_unwind};

pub use handle::{ActorError, OverlayHandle};
pub use messages::{OverlayMessage, OverlayQuery, QueryResult};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::layout::{LayoutAdapter, ScheduledTransition};
use super::range::RangeCommandRouter;
use super::state::{OverlaySnapshot, OverlayState};
use super::surface::{RangeController, RenderSurface};
use super::types::SizePreset;
use super::visibility::VisibilityGate;
use crate::config::OverlayConfig;

/// Channel buffer size for the overlay actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Collaborators handed to the actor on spawn.
pub struct ActorParts {
    pub config: OverlayConfig,
    pub surface: Box<dyn RenderSurface>,
    pub range: Box<dyn RangeController>,
    pub state: OverlayState,
}

/// The actor that owns all overlay state.
pub struct OverlayActor {
    config: OverlayConfig,
    surface: Box<dyn RenderSurface>,
    range: Box<dyn RangeController>,
    gate: VisibilityGate,
    layout: LayoutAdapter,
    router: RangeCommandRouter,
    state: OverlayState,

    /// Timer task of the pending transition, if any.
    timer: Option<JoinHandle<()>>,

    /// Weak sender used by timer tasks to post back.
    timer_sender: mpsc::WeakSender<OverlayMessage>,

    /// Receiver for incoming messages.
    receiver: mpsc::Receiver<OverlayMessage>,
}

impl OverlayActor {
    /// Spawn a new overlay actor on `runtime` and return a handle for
    /// communication.
    ///
    /// The actor stops on [`OverlayMessage::Shutdown`] or once every handle
    /// has been dropped.
    #[must_use]
    pub fn spawn(runtime: &Handle, parts: ActorParts) -> OverlayHandle {
        tracing::debug!("overlay: spawning overlay actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let actor = Self {
            gate: VisibilityGate::new(),
            layout: LayoutAdapter::new(parts.config.settle_delay()),
            router: RangeCommandRouter::new(&parts.config.range_events),
            config: parts.config,
            surface: parts.surface,
            range: parts.range,
            state: parts.state,
            timer: None,
            timer_sender: sender.downgrade(),
            receiver,
        };

        runtime.spawn(actor.run());

        OverlayHandle::new(sender)
    }

    /// Run the actor's message loop.
    async fn run(mut self) {
        tracing::trace!("overlay: actor message loop starting");

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, OverlayMessage::Shutdown) {
                tracing::debug!("overlay: actor received shutdown message");
                break;
            }

            let msg_name = msg.name();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.handle_message(msg);
            }));

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(
                    message = msg_name,
                    panic = %panic_msg,
                    "overlay: actor recovered from panic, state may be inconsistent"
                );
            }

            self.publish();
        }

        self.cancel_timer();
        tracing::debug!("overlay: actor stopped");
    }

    /// Handle a single message.
    fn handle_message(&mut self, msg: OverlayMessage) {
        match msg {
            OverlayMessage::LayoutSettingChanged(setting) => {
                self.gate.on_setting_changed(setting, self.surface.as_mut());
            }
            OverlayMessage::SetVisible(visible) => {
                self.gate.set_visible(visible, self.surface.as_mut());
            }
            OverlayMessage::ScreenStateChanged(event) => {
                tracing::debug!(?event, "overlay: screen state changed");
                if let Some(scheduled) = self.layout.on_screen_state(event) {
                    self.arm_timer(scheduled);
                }
            }
            OverlayMessage::CompanionPower(powered) => {
                tracing::debug!(powered, "overlay: companion power notification");
                if let Some(scheduled) = self.layout.on_companion_power(powered) {
                    self.arm_timer(scheduled);
                }
            }
            OverlayMessage::TransitionSettled { token } => {
                if let Some(preset) = self.layout.on_settled(token) {
                    self.timer = None;
                    self.commit(preset);
                }
            }
            OverlayMessage::Interaction(code) => {
                self.router.route(&code, self.surface.as_ref(), self.range.as_mut());
            }
            OverlayMessage::Query { query, respond_to } => {
                let result = self.execute_query(query);
                if respond_to.send(result).is_err() {
                    tracing::warn!("overlay: failed to send query response (channel closed)");
                }
            }

            // Shutdown handled in run()
            OverlayMessage::Shutdown => {}
        }
    }

    fn execute_query(&self, query: OverlayQuery) -> QueryResult {
        match query {
            OverlayQuery::Snapshot => QueryResult::Snapshot(self.snapshot()),
            OverlayQuery::Render => QueryResult::Node(self.surface.node()),
        }
    }

    // ========================================================================
    // Layout transitions
    // ========================================================================

    /// Arms the settle timer for a transition, aborting any previous one.
    fn arm_timer(&mut self, scheduled: ScheduledTransition) {
        self.cancel_timer();

        let ScheduledTransition { token, target, delay } = scheduled;
        let sender = self.timer_sender.clone();
        tracing::debug!(token, preset = %target, ?delay, "overlay: layout transition scheduled");

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(sender) = sender.upgrade() else {
                return;
            };
            if sender.send(OverlayMessage::TransitionSettled { token }).await.is_err() {
                tracing::trace!(token, "overlay: actor gone before transition settled");
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Applies a settled preset to the surface.
    fn commit(&mut self, preset: SizePreset) {
        let size = preset.size(&self.config);
        self.surface.set_projected_size(size);
        self.surface
            .set_style_class(&self.config.reversionary_class, preset.has_reversionary_class());
        tracing::info!(preset = %preset, %size, "overlay: inset resized");
    }

    // ========================================================================
    // State publication
    // ========================================================================

    fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot::capture(&self.gate, &self.layout, self.surface.as_ref())
    }

    fn publish(&self) { self.state.publish(self.snapshot(), self.surface.node()); }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::overlay::render::ROOT_CLASS;
    use crate::overlay::surface::{IndexedRangeController, InsetSurface};
    use crate::overlay::types::{LayoutSetting, ScreenMode, ScreenStateEvent};

    fn spawn_actor() -> (OverlayHandle, IndexedRangeController) {
        let config = OverlayConfig::default();
        let surface = InsetSurface::new(&config);
        let range = IndexedRangeController::new(&config.map);
        let state = OverlayState::new(
            OverlaySnapshot::capture(
                &VisibilityGate::new(),
                &LayoutAdapter::new(config.settle_delay()),
                &surface,
            ),
            surface.node(),
        );
        let handle = OverlayActor::spawn(&Handle::current(), ActorParts {
            config,
            surface: Box::new(surface),
            range: Box::new(range.clone()),
            state,
        });
        (handle, range)
    }

    #[tokio::test(start_paused = true)]
    async fn test_expanded_commits_after_settle_delay() {
        let (handle, _) = spawn_actor();
        handle
            .send_async(OverlayMessage::ScreenStateChanged(ScreenStateEvent::to(
                ScreenMode::Reversionary,
            )))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        let node = handle.render().await.unwrap();
        assert_eq!(node.width, 242);
        assert!(!node.has_class("reversionary"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        let node = handle.render().await.unwrap();
        assert_eq!(node.width, 312);
        assert!(node.has_class("reversionary"));
        assert!(node.has_class(ROOT_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interaction_routed_only_when_awake() {
        let (handle, range) = spawn_actor();
        let start = range.index();

        handle.set_visible(false).unwrap();
        handle
            .send_async(OverlayMessage::Interaction("AS1000_PFD_RANGE_INC".to_string()))
            .await
            .unwrap();
        handle.snapshot().await.unwrap();
        assert_eq!(range.index(), start);

        handle.send_async(OverlayMessage::LayoutSettingChanged(LayoutSetting::Tfc)).await.unwrap();
        handle
            .send_async(OverlayMessage::Interaction("AS1000_PFD_RANGE_INC".to_string()))
            .await
            .unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.awake);
        assert_eq!(range.index(), start + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_actor() {
        let (handle, _) = spawn_actor();
        handle.shutdown().unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_closed());
        assert!(handle.snapshot().await.is_err());
    }
}
