//! Handle for communicating with the overlay actor.
//!
//! The `OverlayHandle` provides a cheap, cloneable interface for sending
//! messages to the overlay actor and querying its state.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::messages::{OverlayMessage, OverlayQuery, QueryResult};
use crate::overlay::render::InsetNode;
use crate::overlay::state::OverlaySnapshot;

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    /// The actor answered with a result of the wrong kind.
    #[error("Unexpected query result")]
    UnexpectedResult,
}

/// Handle for communicating with the overlay actor.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    sender: mpsc::Sender<OverlayMessage>,
}

impl OverlayHandle {
    /// Create a new handle with the given sender.
    pub(crate) const fn new(sender: mpsc::Sender<OverlayMessage>) -> Self { Self { sender } }

    /// Whether the actor has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.sender.is_closed() }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Send a message to the actor without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: OverlayMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Send a message to the actor and wait for delivery.
    ///
    /// This waits if the channel buffer is full.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn send_async(&self, msg: OverlayMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Execute a query and wait for the result.
    ///
    /// The answer reflects every message sent before the query.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: OverlayQuery) -> Result<QueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(OverlayMessage::Query { query, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Execute a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: OverlayQuery,
        timeout: Duration,
    ) -> Result<QueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    // ========================================================================
    // Convenience methods
    // ========================================================================

    /// Get the current state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn snapshot(&self) -> Result<OverlaySnapshot, ActorError> {
        match self.query(OverlayQuery::Snapshot).await? {
            QueryResult::Snapshot(snapshot) => Ok(snapshot),
            QueryResult::Node(_) => Err(ActorError::UnexpectedResult),
        }
    }

    /// Get the current render node.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn render(&self) -> Result<InsetNode, ActorError> {
        match self.query(OverlayQuery::Render).await? {
            QueryResult::Node(node) => Ok(node),
            QueryResult::Snapshot(_) => Err(ActorError::UnexpectedResult),
        }
    }

    /// Force the inset shown or hidden.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn set_visible(&self, visible: bool) -> Result<(), ActorError> {
        self.send(OverlayMessage::SetVisible(visible))
    }

    /// Ask the actor to stop.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(OverlayMessage::Shutdown) }
}
