#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Shared test utilities for chatroom client integration tests.
//!
//! Provides a channel-fed [`MockTransport`] plus a [`MockConnector`] that
//! hands out scripted sessions, so tests can drive the full
//! `RoomConnectionManager` lifecycle without a real WebSocket backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chatroom_client::{ChatClientError, Connector, Transport};
use tokio::sync::mpsc;

// ── MockTransport ───────────────────────────────────────────────────

/// A channel-fed mock transport.
///
/// Inbound frames are injected at any time through the paired
/// [`SessionHandle`]; `recv()` waits in between, which makes it naturally
/// cancel-safe. Dropping the handle's sender ends the stream — a clean
/// remote close. Every frame the client sends is recorded.
pub struct MockTransport {
    incoming: mpsc::UnboundedReceiver<Result<String, ChatClientError>>,
    sent: Arc<StdMutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, frame: String) -> Result<(), ChatClientError> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String, ChatClientError>> {
        self.incoming.recv().await
    }

    async fn close(&mut self) -> Result<(), ChatClientError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

// ── SessionHandle ───────────────────────────────────────────────────

/// Test-side handle to one scripted connection session.
pub struct SessionHandle {
    frames: mpsc::UnboundedSender<Result<String, ChatClientError>>,
    /// Frames the client wrote to this transport.
    pub sent: Arc<StdMutex<Vec<String>>>,
    /// Whether the client closed this transport.
    pub closed: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Inject a raw inbound frame. A send to an already-finished session is
    /// deliberately ignored — that is what stale-transport tests exercise.
    pub fn inject(&self, raw: &str) {
        let _ = self.frames.send(Ok(raw.to_string()));
    }

    /// Inject a transport-level receive error.
    pub fn inject_error(&self, reason: &str) {
        let _ = self
            .frames
            .send(Err(ChatClientError::TransportReceive(reason.to_string())));
    }

    /// Snapshot of the frames the client has written so far.
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

/// Create one scripted session: the transport (to script into the
/// connector) and the handle (for the test to drive it).
pub fn session() -> (Result<MockTransport, ChatClientError>, SessionHandle) {
    let (frame_tx, frame_rx) = mpsc::unbounded_channel();
    let sent = Arc::new(StdMutex::new(Vec::new()));
    let closed = Arc::new(AtomicBool::new(false));
    let transport = MockTransport {
        incoming: frame_rx,
        sent: Arc::clone(&sent),
        closed: Arc::clone(&closed),
    };
    (
        Ok(transport),
        SessionHandle {
            frames: frame_tx,
            sent,
            closed,
        },
    )
}

/// Create a session whose dial fails with the given reason.
pub fn failing_session(reason: &str) -> Result<MockTransport, ChatClientError> {
    Err(ChatClientError::TransportReceive(reason.to_string()))
}

// ── MockConnector ───────────────────────────────────────────────────

/// A connector that hands out pre-scripted sessions.
///
/// Each `connect` call consumes one session and records the dialed URL;
/// running out of sessions is a connect error. Sessions are matched by an
/// optional URL-substring key, so tests that open rooms back to back (where
/// dial order is up to the scheduler) still pair each room with its
/// intended session; unkeyed sessions are consumed in connect order.
pub struct MockConnector {
    sessions: StdMutex<VecDeque<(Option<String>, Result<MockTransport, ChatClientError>)>>,
    /// URLs passed to `connect`, in order.
    pub dialed: Arc<StdMutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new(sessions: Vec<Result<MockTransport, ChatClientError>>) -> Self {
        Self {
            sessions: StdMutex::new(sessions.into_iter().map(|s| (None, s)).collect()),
            dialed: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Script sessions keyed by a URL substring (e.g. `"/chat/r1/"`).
    pub fn new_keyed(sessions: Vec<(&str, Result<MockTransport, ChatClientError>)>) -> Self {
        Self {
            sessions: StdMutex::new(
                sessions
                    .into_iter()
                    .map(|(key, s)| (Some(key.to_string()), s))
                    .collect(),
            ),
            dialed: Arc::new(StdMutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Transport = MockTransport;

    async fn connect(&self, url: &str) -> Result<MockTransport, ChatClientError> {
        self.dialed.lock().unwrap().push(url.to_string());
        let mut sessions = self.sessions.lock().unwrap();
        let position = sessions
            .iter()
            .position(|(key, _)| key.as_ref().is_none_or(|k| url.contains(k.as_str())));
        match position {
            Some(position) => sessions
                .remove(position)
                .map(|(_, s)| s)
                .unwrap_or_else(|| {
                    Err(ChatClientError::TransportReceive(
                        "no scripted session".into(),
                    ))
                }),
            None => Err(ChatClientError::TransportReceive(
                "no scripted session".into(),
            )),
        }
    }
}
