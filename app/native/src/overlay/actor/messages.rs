//! Message types for the overlay actor.
//!
//! All communication with the overlay actor happens through messages:
//! - `OverlayMessage` - stream notifications, timer expiries and host calls
//! - `OverlayQuery` - requests for state data (with response channel)
//! - `QueryResult` - responses from queries

use tokio::sync::oneshot;

use crate::overlay::render::InsetNode;
use crate::overlay::state::OverlaySnapshot;
use crate::overlay::types::{LayoutSetting, ScreenStateEvent};

// ============================================================================
// Overlay Messages
// ============================================================================

/// Messages sent to the overlay actor.
#[derive(Debug)]
pub enum OverlayMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Stream Notifications (from the event bus)
    // ════════════════════════════════════════════════════════════════════════
    /// Map layout setting changed.
    LayoutSettingChanged(LayoutSetting),

    /// Screen state changed.
    ScreenStateChanged(ScreenStateEvent),

    /// Companion display power notification.
    CompanionPower(bool),

    /// Raw interaction event code.
    Interaction(String),

    // ════════════════════════════════════════════════════════════════════════
    // Timers
    // ════════════════════════════════════════════════════════════════════════
    /// A layout transition's settle delay elapsed.
    TransitionSettled { token: u64 },

    // ════════════════════════════════════════════════════════════════════════
    // Host Calls
    // ════════════════════════════════════════════════════════════════════════
    /// Force the inset shown or hidden.
    SetVisible(bool),

    /// Query state (response via oneshot channel).
    Query {
        query: OverlayQuery,
        respond_to: oneshot::Sender<QueryResult>,
    },

    /// Stop the actor.
    Shutdown,
}

impl OverlayMessage {
    /// Message name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LayoutSettingChanged(_) => "LayoutSettingChanged",
            Self::ScreenStateChanged(_) => "ScreenStateChanged",
            Self::CompanionPower(_) => "CompanionPower",
            Self::Interaction(_) => "Interaction",
            Self::TransitionSettled { .. } => "TransitionSettled",
            Self::SetVisible(_) => "SetVisible",
            Self::Query { .. } => "Query",
            Self::Shutdown => "Shutdown",
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// State queries answered by the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayQuery {
    /// Current state read-out.
    Snapshot,
    /// Current render node.
    Render,
}

/// Query responses.
#[derive(Debug, Clone)]
pub enum QueryResult {
    Snapshot(OverlaySnapshot),
    Node(InsetNode),
}
