//! Wire frame and message types for the chat protocol.
//!
//! The wire contract is deliberately minimal: every frame, inbound and
//! outbound, is a JSON object with a single `message` field of type string.
//! There is no envelope, no sequence number, and no sender id — the
//! transport's own session (the room URL it was dialed with) carries that
//! context. The backend relays frames to the room group unchanged.
//!
//! Frames that do not match this shape are dropped by the caller; decoding
//! is lenient and never fails loudly.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// ── Wire frame ──────────────────────────────────────────────────────

/// A single chat frame as it appears on the wire: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFrame {
    /// The chat text carried by this frame.
    pub message: String,
}

impl ChatFrame {
    /// Build a frame carrying the given text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Decode an inbound text frame, leniently.
    ///
    /// Returns `None` for anything that is not a JSON object with a string
    /// `message` field — malformed JSON, arrays, numbers, a missing field,
    /// or a field of the wrong type. Never panics; unrecognized frames are
    /// the caller's cue to drop silently.
    ///
    /// Goes through [`serde_json::Value`] rather than the derived
    /// deserializer so that only a JSON *object* is accepted (the derive
    /// would also admit a single-element array).
    pub fn decode(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        let serde_json::Value::Object(mut fields) = value else {
            return None;
        };
        match fields.remove("message") {
            Some(serde_json::Value::String(message)) => Some(Self { message }),
            _ => None,
        }
    }

    /// Encode this frame to its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails, which for this
    /// struct only happens if the text contains invalid data serde_json
    /// cannot represent.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ── Message log entries ─────────────────────────────────────────────

/// Unique token for one log entry, monotonically increasing per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

/// Which side of the conversation a message originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Sent by the local participant.
    Mine,
    /// Received from the remote side of the room.
    Remote,
}

/// Delivery progress of a locally-originated message.
///
/// Only [`Sent`](DeliveryState::Sent) is ever assigned today; `Delivered`
/// and `Read` exist for receipt support the backend does not yet provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Sent,
    Delivered,
    Read,
}

/// One entry in a room's in-memory message log.
///
/// Remote messages carry no delivery state. The timestamp is the local
/// clock at append time — frames carry no timestamp of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique local identifier for this entry.
    pub id: MessageId,
    /// The chat text.
    pub text: String,
    /// Which side this message originated from.
    pub origin: MessageOrigin,
    /// Local clock reading when the entry was appended.
    pub sent_at: SystemTime,
    /// Delivery progress; `None` for remote messages.
    pub delivery: Option<DeliveryState>,
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn frame_encodes_to_single_field_object() {
        let frame = ChatFrame::new("hello");
        assert_eq!(frame.encode().unwrap(), r#"{"message":"hello"}"#);
    }

    #[test]
    fn frame_decodes_wire_shape() {
        let frame = ChatFrame::decode(r#"{"message":"hi there"}"#).unwrap();
        assert_eq!(frame.message, "hi there");
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(ChatFrame::decode("not json at all").is_none());
        assert!(ChatFrame::decode("").is_none());
    }

    #[test]
    fn decode_rejects_missing_field() {
        assert!(ChatFrame::decode(r#"{"msg":"hi"}"#).is_none());
        assert!(ChatFrame::decode("{}").is_none());
    }

    #[test]
    fn decode_rejects_wrong_shapes() {
        assert!(ChatFrame::decode(r#"["message","hi"]"#).is_none());
        assert!(ChatFrame::decode(r#"["hi"]"#).is_none());
        assert!(ChatFrame::decode(r#""message""#).is_none());
        assert!(ChatFrame::decode("42").is_none());
        assert!(ChatFrame::decode(r#"{"message":42}"#).is_none());
        assert!(ChatFrame::decode(r#"{"message":null}"#).is_none());
    }

    #[test]
    fn decode_preserves_unicode_text() {
        let frame = ChatFrame::decode(r#"{"message":"olá, não se preocupe"}"#).unwrap();
        assert_eq!(frame.message, "olá, não se preocupe");
    }

    #[test]
    fn delivery_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeliveryState::Sent).unwrap(),
            r#""sent""#
        );
        assert_eq!(
            serde_json::to_string(&DeliveryState::Read).unwrap(),
            r#""read""#
        );
    }
}
