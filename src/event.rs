//! Events emitted by the room connection manager.
//!
//! Each call to [`open_room`](crate::RoomConnectionManager::open_room)
//! returns a bounded receiver of [`RoomEvent`]s for that room's connection.
//! When the consumer cannot keep up, events other than
//! [`Disconnected`](RoomEvent::Disconnected) are dropped with a warning
//! rather than blocking the transport loop; `Disconnected` is always the
//! final event on the channel and is always delivered.

use crate::protocol::Message;

/// An event from one room's connection lifecycle.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// The transport handshake completed; the room is open for sending.
    Connected,
    /// An inbound frame was decoded and appended to the message log.
    MessageReceived(Message),
    /// The connection ended — handshake failure, transport error, remote
    /// close, or an explicit close/room switch on this side.
    ///
    /// `reason` is `None` for a clean remote close.
    Disconnected {
        /// Human-readable description of why the connection ended.
        reason: Option<String>,
    },
}
