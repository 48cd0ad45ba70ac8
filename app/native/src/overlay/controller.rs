//! Overlay controller: the composition root the host talks to.
//!
//! The controller validates the configuration, holds the collaborators until
//! activation, and then hands them to the overlay actor. A single forwarder
//! task moves stream notifications from [`OverlayStreams`] into the actor's
//! channel.

use futures::{Stream, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::actor::{ActorParts, OverlayActor, OverlayHandle, OverlayMessage};
use super::bus::OverlayStreams;
use super::layout::LayoutAdapter;
use super::render::InsetNode;
use super::state::{OverlaySnapshot, OverlayState};
use super::surface::{RangeController, RenderSurface};
use super::visibility::VisibilityGate;
use crate::config::{InsetSize, OverlayConfig};
use crate::error::OverlayError;
use crate::events;

/// Collaborators waiting for `activate()`.
struct Pending {
    surface: Box<dyn RenderSurface>,
    range: Box<dyn RangeController>,
    streams: OverlayStreams,
}

/// The traffic map inset overlay.
pub struct OverlayController {
    config: OverlayConfig,
    state: OverlayState,
    pending: Option<Pending>,
    handle: Option<OverlayHandle>,
    forwarder: Option<JoinHandle<()>>,
}

impl OverlayController {
    /// Creates a controller around a render surface and a range controller.
    ///
    /// Nothing is subscribed until [`Self::activate`].
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn new(
        config: OverlayConfig,
        surface: Box<dyn RenderSurface>,
        range: Box<dyn RangeController>,
        streams: OverlayStreams,
    ) -> Result<Self, OverlayError> {
        config.validate()?;

        let state = OverlayState::new(
            OverlaySnapshot::capture(
                &VisibilityGate::new(),
                &LayoutAdapter::new(config.settle_delay()),
                surface.as_ref(),
            ),
            surface.node(),
        );

        Ok(Self {
            config,
            state,
            pending: Some(Pending { surface, range, streams }),
            handle: None,
            forwarder: None,
        })
    }

    /// The configuration the overlay runs with.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig { &self.config }

    /// Whether the overlay is running.
    #[must_use]
    pub fn is_active(&self) -> bool { self.handle.as_ref().is_some_and(|h| !h.is_closed()) }

    /// Starts the overlay: spawns the actor, hides the inset and subscribes
    /// to every stream.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NoRuntime`] if called outside a tokio runtime.
    pub fn activate(&mut self) -> Result<(), OverlayError> {
        if self.pending.is_none() {
            tracing::debug!("overlay: already activated");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|_| OverlayError::NoRuntime)?;
        let Some(Pending { surface, range, streams }) = self.pending.take() else {
            return Ok(());
        };

        let handle = OverlayActor::spawn(&runtime, ActorParts {
            config: self.config.clone(),
            surface,
            range,
            state: self.state.clone(),
        });

        // Hidden until the first layout setting arrives
        handle.set_visible(false)?;

        self.forwarder = Some(runtime.spawn(forward_streams(streams, handle.clone())));
        self.handle = Some(handle);

        tracing::info!(topics = ?events::ALL, "overlay: activated");
        Ok(())
    }

    /// Forces the inset shown or hidden.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotActive`] before activation or after shutdown.
    pub fn set_visible(&self, visible: bool) -> Result<(), OverlayError> {
        let handle = self.handle.as_ref().ok_or(OverlayError::NotActive)?;
        handle.set_visible(visible).map_err(|_| OverlayError::NotActive)
    }

    /// Produces the current visual node.
    #[must_use]
    pub fn render(&self) -> InsetNode { self.state.node() }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> OverlaySnapshot { self.state.snapshot() }

    /// State after every message already queued has been handled.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotActive`] if the actor is not running.
    pub async fn sync(&self) -> Result<OverlaySnapshot, OverlayError> {
        let handle = self.handle.as_ref().ok_or(OverlayError::NotActive)?;
        Ok(handle.snapshot().await?)
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn watch(&self) -> eyeball::Subscriber<OverlaySnapshot> { self.state.subscribe() }

    /// Render node updates, starting from the next published change.
    pub fn watch_node(&self) -> eyeball::Subscriber<InsetNode> { self.state.subscribe_node() }

    /// Stream of projected size changes.
    pub fn watch_projected_size(&self) -> impl Stream<Item = InsetSize> + use<> {
        let mut last = self.state.snapshot().size;
        self.state.subscribe().filter_map(move |snapshot| {
            let changed = snapshot.size != last;
            last = snapshot.size;
            futures::future::ready(changed.then_some(snapshot.size))
        })
    }

    /// Stops the overlay and drops every subscription.
    pub fn shutdown(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        if let Some(handle) = self.handle.take()
            && handle.shutdown().is_err()
        {
            tracing::debug!("overlay: actor already stopped");
        }
        tracing::info!("overlay: shut down");
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

/// Moves stream notifications into the actor until every stream closes or
/// the actor stops.
///
/// The layout setting's current value is delivered first. When several
/// streams are ready at once they are drained in subscription order.
async fn forward_streams(mut streams: OverlayStreams, handle: OverlayHandle) {
    let initial = streams.layout.get();
    if handle.send_async(OverlayMessage::LayoutSettingChanged(initial)).await.is_err() {
        return;
    }

    let mut layout_open = true;
    let mut screen_open = true;
    let mut power_open = true;
    let mut interaction_open = true;

    loop {
        let msg = tokio::select! {
            biased;

            setting = streams.layout.next(), if layout_open => match setting {
                Some(setting) => Some(OverlayMessage::LayoutSettingChanged(setting)),
                None => {
                    layout_open = false;
                    stream_closed(events::settings::MAP_LAYOUT)
                }
            },
            event = streams.screen_state.recv(), if screen_open => match event {
                Ok(event) => Some(OverlayMessage::ScreenStateChanged(event)),
                Err(err) => {
                    screen_open = recv_failed(events::instrument::SCREEN_STATE, &err);
                    None
                }
            },
            powered = streams.companion_power.recv(), if power_open => match powered {
                Ok(powered) => Some(OverlayMessage::CompanionPower(powered)),
                Err(err) => {
                    power_open = recv_failed(events::mfd::POWER_ON, &err);
                    None
                }
            },
            code = streams.interaction.recv(), if interaction_open => match code {
                Ok(code) => Some(OverlayMessage::Interaction(code)),
                Err(err) => {
                    interaction_open = recv_failed(events::input::H_EVENT, &err);
                    None
                }
            },
            else => break,
        };

        if let Some(msg) = msg
            && handle.send_async(msg).await.is_err()
        {
            tracing::debug!("overlay: actor stopped, forwarder exiting");
            return;
        }
    }

    tracing::debug!("overlay: every stream closed, forwarder exiting");
}

fn stream_closed(topic: &str) -> Option<OverlayMessage> {
    tracing::debug!(topic, "overlay: stream closed");
    None
}

/// Logs a broadcast receive error. Returns whether the stream is still open.
fn recv_failed(topic: &str, err: &RecvError) -> bool {
    match err {
        RecvError::Lagged(skipped) => {
            tracing::warn!(topic, skipped, "overlay: stream lagged, notifications dropped");
            true
        }
        RecvError::Closed => {
            stream_closed(topic);
            false
        }
    }
}
