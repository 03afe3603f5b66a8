//! Presentation channel
//!
//! This module defines the trait through which a game session reports
//! changes to whatever renders it. The session never renders anything
//! itself; it only pushes messages down the tunnel.

use super::{SyncMessage, UpdateMessage};

/// Trait for sending messages to the presentation layer
///
/// Implementations might draw to a terminal, forward over a WebSocket, or
/// simply record messages in tests.
pub trait Tunnel {
    /// Sends an incremental update
    ///
    /// Update messages describe a single change, such as an option being
    /// selected or a hint arriving.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a full snapshot of the session
    ///
    /// Used when a renderer connects or needs to redraw from scratch.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);

    /// Closes the tunnel
    ///
    /// Called once the session is done with this renderer; no further
    /// messages are sent through it.
    fn close(self);
}
