//! PFD traffic map inset overlay.
//!
//! Shows a small traffic map inset on a primary flight display and adapts its
//! visibility and size to the display configuration:
//! - the PFD map layout setting shows or hides the inset and wakes or sleeps
//!   the map
//! - reversionary mode expands the inset, and it shrinks back once the
//!   companion display is powered
//! - range knob events reach the map only while it is awake
//!
//! The overlay itself lives in [`overlay`]. The binary wraps it with a CLI for
//! replaying event scenarios and managing the configuration file.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod overlay;
pub mod scenario;
pub mod schema;
