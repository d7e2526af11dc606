//! # Chatroom Client
//!
//! Transport-agnostic Rust client for room-based live chat over JSON text
//! frames.
//!
//! The crate centers on [`RoomConnectionManager`]: it derives a canonical
//! room identifier from routing inputs (an explicit `/chat/<token>` URL or
//! a sorted pairing of two participant ids), owns exactly one live
//! transport for the active room, and exposes an append-only, time-ordered
//! message log to the rendering layer. The wire contract is a single
//! `{"message": "..."}` JSON frame in both directions.
//!
//! ## Features
//!
//! - **Transport-agnostic** — implement the [`Transport`] and
//!   [`Connector`] traits for any backend
//! - **WebSocket built-in** — default `transport-websocket` feature
//!   provides [`WebSocketTransport`] and [`WebSocketConnector`]
//! - **Event-driven** — receive [`RoomEvent`]s via a channel per room
//! - **Race-proof room switching** — a generation token discards callbacks
//!   from superseded transports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatroom_client::{
//!     resolve_room_id, RoomConnectionManager, RoomEvent, RoomManagerConfig,
//!     WebSocketConnector,
//! };
//!
//! let room = resolve_room_id("/chat", Some("zelda"), Some("alice"))
//!     .expect("both participants known");
//!
//! let mut manager = RoomConnectionManager::new(
//!     WebSocketConnector,
//!     RoomManagerConfig::new("chat.example.org").with_secure(true),
//! );
//! let mut events = manager.open_room(room);
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         RoomEvent::Connected => { manager.send_message("olá!"); }
//!         RoomEvent::MessageReceived(msg) => println!("{}", msg.text),
//!         RoomEvent::Disconnected { .. } => break,
//!     }
//! }
//! manager.close_room().await;
//! ```

pub mod error;
pub mod event;
#[cfg(feature = "tokio-runtime")]
pub mod manager;
pub mod protocol;
pub mod room;
pub mod transport;
pub mod transports;

// Re-export primary types for ergonomic imports.
pub use error::ChatClientError;
pub use event::RoomEvent;
#[cfg(feature = "tokio-runtime")]
pub use manager::{ConnectionState, RoomConnectionManager, RoomManagerConfig, SendResult};
pub use protocol::{ChatFrame, DeliveryState, Message, MessageId, MessageOrigin};
pub use room::{resolve_room_id, room_endpoint, RoomId};
pub use transport::{Connector, Transport};

#[cfg(feature = "transport-websocket")]
pub use transports::{WebSocketConnector, WebSocketTransport};
