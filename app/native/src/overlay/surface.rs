//! Render surface and range control seams.
//!
//! The overlay's state machine never touches the map engine directly. It
//! talks to two narrow collaborators:
//! - [`RenderSurface`] - activation (wake/sleep), hidden styling, projected
//!   size and style classes of the inset
//! - [`RangeController`] - the map's indexed range
//!
//! [`InsetSurface`] and [`IndexedRangeController`] are the default adapters.

use std::sync::Arc;

use eyeball::SharedObservable;
use parking_lot::Mutex;
use smallvec::{SmallVec, smallvec};

use super::render::{InsetNode, MapNode, ROOT_CLASS};
use super::types::RangeDelta;
use crate::config::{InsetSize, MapConfig, OverlayConfig};

/// Mutable view of the inset the overlay drives.
///
/// Implementations must make `wake` and `sleep` idempotent: repeated calls
/// while already in the requested state have no observable effect.
pub trait RenderSurface: Send {
    /// Resumes map updates.
    fn wake(&mut self);

    /// Suspends map updates.
    fn sleep(&mut self);

    /// Whether the map is currently updating.
    fn is_awake(&self) -> bool;

    /// Applies or clears the hidden (`display: none`) styling.
    fn set_hidden(&mut self, hidden: bool);

    /// Sets the size the map projects into.
    fn set_projected_size(&mut self, size: InsetSize);

    /// Adds or removes a style class on the inset root.
    fn set_style_class(&mut self, name: &str, enabled: bool);

    /// Produces the current visual node.
    fn node(&self) -> InsetNode;
}

/// Receiver of range knob commands.
pub trait RangeController: Send {
    /// Moves the map range by one index.
    fn change_range_index(&mut self, delta: RangeDelta);
}

// ============================================================================
// InsetSurface
// ============================================================================

/// Default in-process surface for the traffic inset.
///
/// The projected size lives in a [`SharedObservable`] so a map engine (or any
/// host code) can subscribe to size changes without going through the actor.
pub struct InsetSurface {
    map: MapConfig,
    hidden: bool,
    awake: bool,
    classes: SmallVec<[String; 2]>,
    projected_size: SharedObservable<InsetSize>,
    wake_count: u32,
    sleep_count: u32,
}

impl std::fmt::Debug for InsetSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsetSurface")
            .field("map", &self.map.id)
            .field("hidden", &self.hidden)
            .field("awake", &self.awake)
            .field("classes", &self.classes)
            .field("projected_size", &self.projected_size.get())
            .finish_non_exhaustive()
    }
}

impl InsetSurface {
    /// Creates a surface sized to the compact preset, awake and displayed.
    ///
    /// The overlay hides and sleeps it on activation.
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            map: config.map.clone(),
            hidden: false,
            awake: true,
            classes: smallvec![ROOT_CLASS.to_string()],
            projected_size: SharedObservable::new(config.compact),
            wake_count: 0,
            sleep_count: 0,
        }
    }

    /// Returns a handle to the observable projected size.
    #[must_use]
    pub fn projected_size(&self) -> SharedObservable<InsetSize> { self.projected_size.clone() }

    /// Number of asleep-to-awake transitions performed.
    #[must_use]
    pub const fn wake_count(&self) -> u32 { self.wake_count }

    /// Number of awake-to-asleep transitions performed.
    #[must_use]
    pub const fn sleep_count(&self) -> u32 { self.sleep_count }

    /// Whether the root carries `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool { self.classes.iter().any(|c| c == name) }
}

impl RenderSurface for InsetSurface {
    fn wake(&mut self) {
        if self.awake {
            return;
        }
        self.awake = true;
        self.wake_count += 1;
        tracing::trace!(map = %self.map.id, "overlay: map awake");
    }

    fn sleep(&mut self) {
        if !self.awake {
            return;
        }
        self.awake = false;
        self.sleep_count += 1;
        tracing::trace!(map = %self.map.id, "overlay: map asleep");
    }

    fn is_awake(&self) -> bool { self.awake }

    fn set_hidden(&mut self, hidden: bool) { self.hidden = hidden; }

    fn set_projected_size(&mut self, size: InsetSize) {
        self.projected_size.set_if_not_eq(size);
    }

    fn set_style_class(&mut self, name: &str, enabled: bool) {
        let present = self.has_class(name);
        if enabled && !present {
            self.classes.push(name.to_string());
        } else if !enabled && present && name != ROOT_CLASS {
            self.classes.retain(|c| c != name);
        }
    }

    fn node(&self) -> InsetNode {
        let size = self.projected_size.get();
        InsetNode {
            classes: self.classes.clone(),
            hidden: self.hidden,
            width: size.width,
            height: size.height,
            map: MapNode::from(&self.map),
        }
    }
}

// ============================================================================
// IndexedRangeController
// ============================================================================

/// Range controller over a fixed number of range steps.
///
/// Cloning yields another handle to the same index, so the host can read the
/// current range while the overlay owns a handle for writing.
#[derive(Debug, Clone)]
pub struct IndexedRangeController {
    index: Arc<Mutex<u32>>,
    steps: u32,
}

impl IndexedRangeController {
    /// Creates a controller from the map configuration.
    #[must_use]
    pub fn new(map: &MapConfig) -> Self {
        let steps = map.range_steps.max(1);
        Self {
            index: Arc::new(Mutex::new(map.initial_range_index.min(steps - 1))),
            steps,
        }
    }

    /// Current range index.
    #[must_use]
    pub fn index(&self) -> u32 { *self.index.lock() }
}

impl RangeController for IndexedRangeController {
    fn change_range_index(&mut self, delta: RangeDelta) {
        let mut index = self.index.lock();
        let next = match delta {
            RangeDelta::Increment => (*index + 1).min(self.steps - 1),
            RangeDelta::Decrement => index.saturating_sub(1),
        };
        if next != *index {
            tracing::debug!(from = *index, to = next, "overlay: map range index changed");
            *index = next;
        }
    }
}
