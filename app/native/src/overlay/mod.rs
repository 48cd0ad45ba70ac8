//! Traffic map inset overlay.
//!
//! Shows a small traffic map inset on the PFD and adapts its visibility and
//! size to the display configuration.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                              EventBus                                │
//! │  map layout (observable)   screen state   companion power   H events │
//! └────────────┬──────────────────┬───────────────┬──────────────┬───────┘
//!              │                  │               │              │
//!              ▼                  ▼               ▼              ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                    Stream forwarder (one task)                       │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    │ OverlayMessage
//!                                    ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           OverlayActor                               │
//! │                                                                      │
//! │  VisibilityGate ──── wake/sleep, hidden ─────┐                       │
//! │  LayoutAdapter ───── size, style class ──────┼──▶ RenderSurface      │
//! │  RangeCommandRouter ─ reads awake ───────────┘                       │
//! │         │                                                            │
//! │         └──────────────────────────────────────▶ RangeController     │
//! │                                                                      │
//! │  settle timers ── TransitionSettled { token } ──▶ (back to actor)    │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    │ publish after every message
//!                                    ▼
//!                      OverlayState (snapshot + node)
//!                                    │
//!                                    ▼
//!                 OverlayController::render() / watch()
//! ```
//!
//! # Modules
//!
//! - `actor` - Message loop owning all overlay state
//! - `bus` - Publishing and subscribing sides of the input streams
//! - `controller` - Host-facing lifecycle (`activate`, `set_visible`, `render`)
//! - `layout` - Screen mode and power driven size state machine
//! - `range` - Range knob routing
//! - `render` - Visual node
//! - `state` - Observable snapshot
//! - `surface` - Render surface and range controller seams
//! - `types` - Value types
//! - `visibility` - Layout setting driven visibility

pub mod actor;
pub mod bus;
pub mod controller;
pub mod layout;
pub mod range;
pub mod render;
pub mod state;
pub mod surface;
pub mod types;
pub mod visibility;

pub use actor::{ActorError, OverlayHandle};
pub use bus::{EventBus, OverlayStreams};
pub use controller::OverlayController;
pub use layout::{LayoutAdapter, PendingTransition, PowerOnWaiter, ScheduledTransition};
pub use range::RangeCommandRouter;
pub use render::{InsetNode, MapNode, ROOT_CLASS};
pub use state::{OverlaySnapshot, OverlayState};
pub use surface::{IndexedRangeController, InsetSurface, RangeController, RenderSurface};
pub use types::{LayoutSetting, RangeDelta, ScreenMode, ScreenStateEvent, SizePreset};
pub use visibility::VisibilityGate;
