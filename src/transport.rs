//! Transport abstraction for the chat protocol.
//!
//! The [`Transport`] trait defines a bidirectional text frame channel
//! between the client and the chat backend. The protocol uses JSON text
//! frames, so every transport implementation must handle framing internally
//! (e.g., WebSocket frames, length-prefixed TCP).
//!
//! Unlike a client that is handed a pre-connected stream, the room manager
//! derives the endpoint address itself (from the room identifier), so
//! connection setup is part of this seam too: a [`Connector`] dials a URL
//! and yields a connected [`Transport`]. Tests substitute a scripted
//! connector; production code uses the WebSocket implementation behind the
//! `transport-websocket` feature.
//!
//! # Implementing a Custom Transport
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use chatroom_client::error::ChatClientError;
//! use chatroom_client::transport::Transport;
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn send(&mut self, frame: String) -> Result<(), ChatClientError> {
//!         // Send the JSON text frame over your transport
//!         todo!()
//!     }
//!
//!     async fn recv(&mut self) -> Option<Result<String, ChatClientError>> {
//!         // Receive the next JSON text frame
//!         // Return None when the connection is closed cleanly
//!         todo!()
//!     }
//!
//!     async fn close(&mut self) -> Result<(), ChatClientError> {
//!         // Gracefully shut down the connection
//!         todo!()
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::ChatClientError;

/// A bidirectional text frame transport for one chat room connection.
///
/// Implementors shuttle serialized JSON strings between the client and the
/// backend. Each call to [`send`](Transport::send) transmits one complete
/// frame; each call to [`recv`](Transport::recv) returns one complete frame.
///
/// # Object Safety
///
/// This trait is object-safe, so `Box<dyn Transport>` works for dynamic
/// dispatch.
///
/// # Cancel Safety
///
/// The [`recv`](Transport::recv) method **MUST** be cancel-safe because it
/// is used inside `tokio::select!`. If `recv` is cancelled before
/// completion, calling it again must not lose frames. Channel-based
/// implementations (e.g., wrapping `mpsc::Receiver`) are naturally
/// cancel-safe.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Send a JSON text frame to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ChatClientError::TransportSend`] if the frame could not be
    /// sent (e.g., connection broken, write buffer full).
    async fn send(&mut self, frame: String) -> Result<(), ChatClientError>;

    /// Receive the next JSON text frame from the backend.
    ///
    /// Returns:
    /// - `Some(Ok(text))` — a complete frame was received
    /// - `Some(Err(e))` — a transport error occurred (e.g., [`ChatClientError::TransportReceive`])
    /// - `None` — the connection was closed cleanly by the backend
    ///
    /// # Cancel Safety
    ///
    /// This method **MUST** be cancel-safe (see [trait documentation](Transport)).
    async fn recv(&mut self) -> Option<Result<String, ChatClientError>>;

    /// Close the transport connection gracefully.
    ///
    /// After calling this method, subsequent calls to [`send`](Transport::send)
    /// and [`recv`](Transport::recv) may return errors or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the graceful shutdown fails. Implementations
    /// should still release resources even if the close handshake fails.
    async fn close(&mut self) -> Result<(), ChatClientError>;
}

/// Dials a room endpoint URL and yields a connected [`Transport`].
///
/// The manager holds one connector for its lifetime and calls it once per
/// room it opens. Connectors are shared with the background connect task,
/// hence `Send + Sync`.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// The transport type this connector produces.
    type Transport: Transport;

    /// Establish a connection to the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established. The manager
    /// treats any connect error as a failed handshake: the room transitions
    /// to `Closed` and no retry is attempted.
    async fn connect(&self, url: &str) -> Result<Self::Transport, ChatClientError>;
}
