//! Error types for the traffic map overlay.
//!
//! This module provides the crate-wide error type. Event handling inside the
//! overlay never fails; these errors only surface from construction,
//! activation, configuration loading and communication with the state actor.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::overlay::ActorError;

/// Errors that can occur while building or driving the overlay.
///
/// Serializes as `{ "kind": ..., "message": ... }` so the CLI can print it
/// as structured output.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum OverlayError {
    /// The overlay configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// The state actor is gone or did not answer.
    #[error("Actor error: {0}")]
    ActorError(String),
    /// `activate()` was called outside of a tokio runtime.
    #[error("No tokio runtime available to run the overlay")]
    NoRuntime,
    /// A host call that needs a running overlay arrived before `activate()`
    /// or after `shutdown()`.
    #[error("Overlay is not active")]
    NotActive,
    /// A scenario file could not be parsed or replayed.
    #[error("Scenario error: {0}")]
    ScenarioError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for OverlayError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => Self::InvalidConfig(msg),
            other => Self::ConfigError(other.to_string()),
        }
    }
}

impl From<ActorError> for OverlayError {
    fn from(err: ActorError) -> Self { Self::ActorError(err.to_string()) }
}
