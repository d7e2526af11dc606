//! Room connection manager.
//!
//! [`RoomConnectionManager`] owns at most one live transport at a time, keyed
//! by the active [`RoomId`]. Opening a room spawns a background connection
//! loop that dials the room endpoint, translates inbound frames into
//! [`Message`]s on an append-only log, and emits [`RoomEvent`]s on a bounded
//! channel. Opening a different room tears the previous connection down
//! first and starts the log fresh.
//!
//! A generation counter acts as a liveness token: every connection loop
//! captures the generation it was spawned under, and every mutation of
//! shared state checks that token against the manager's current one.
//! Callbacks from a superseded transport can therefore never corrupt the
//! log after a rapid room switch.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut manager = RoomConnectionManager::new(
//!     WebSocketConnector,
//!     RoomManagerConfig::new("chat.example.org").with_secure(true),
//! );
//!
//! if let Some(room) = resolve_room_id(path, me, partner) {
//!     let mut events = manager.open_room(room);
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             RoomEvent::Connected => { manager.send_message("hi"); }
//!             RoomEvent::MessageReceived(msg) => { /* render msg */ }
//!             RoomEvent::Disconnected { .. } => break,
//!         }
//!     }
//! }
//! manager.close_room().await;
//! ```

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, SystemTime};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::event::RoomEvent;
use crate::protocol::{ChatFrame, DeliveryState, Message, MessageId, MessageOrigin};
use crate::room::{room_endpoint, RoomId};
use crate::transport::{Connector, Transport};

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default timeout for the graceful shutdown.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`RoomConnectionManager`].
///
/// The only required field is `host` (the chat backend's authority, i.e.
/// hostname plus optional port); all others have sensible defaults.
///
/// # Example
///
/// ```
/// use chatroom_client::RoomManagerConfig;
///
/// let config = RoomManagerConfig::new("chat.example.org");
/// assert_eq!(config.host, "chat.example.org");
/// assert!(!config.secure);
/// ```
///
/// # Tuning
///
/// ```
/// use chatroom_client::RoomManagerConfig;
/// use std::time::Duration;
///
/// let config = RoomManagerConfig::new("localhost:8000")
///     .with_secure(false)
///     .with_event_channel_capacity(512)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct RoomManagerConfig {
    /// Host (and optional port) of the chat backend.
    pub host: String,
    /// Whether to dial secure (`wss`) endpoints. Mirrors the embedding
    /// page's transport security: a secure page gets a secure socket.
    pub secure: bool,
    /// Capacity of the bounded event channel returned by
    /// [`open_room`](RoomConnectionManager::open_room).
    ///
    /// When the consumer cannot keep up with inbound frames, events are
    /// dropped (with a warning logged) to avoid blocking the connection
    /// loop. The `Disconnected` event is always delivered regardless of
    /// capacity.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,
    /// Timeout for the graceful shutdown.
    ///
    /// When [`close_room`](RoomConnectionManager::close_room) is called (or
    /// a room is replaced), the background connection loop is given this
    /// much time to close the transport and emit a final `Disconnected`
    /// event. If the timeout expires the task is aborted.
    ///
    /// Defaults to **1 second**.
    pub shutdown_timeout: Duration,
}

impl RoomManagerConfig {
    /// Create a new configuration for the given backend host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secure: false,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Dial secure (`wss`) endpoints instead of plain (`ws`) ones.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the capacity of the bounded event channel.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    /// Set the timeout for the graceful shutdown.
    ///
    /// Defaults to **1 second**.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

// ── Public state types ──────────────────────────────────────────────

/// Lifecycle state of the manager's active connection.
///
/// ```text
/// Idle ──open_room──▶ Connecting ──handshake ok──▶ Open
///                          │                        │
///                   handshake fails          error / remote close
///                          ▼                        ▼
///                        Closed ◀──────────────── Closed
/// ```
///
/// `Closed` is terminal for one room; the manager re-enters `Connecting`
/// when a new room is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No room has ever been opened.
    Idle,
    /// A transport dial is in flight.
    Connecting,
    /// The handshake completed; frames flow both ways.
    Open,
    /// The connection ended (failure, remote close, or explicit close).
    Closed,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Connecting,
            2 => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// Outcome of a [`send_message`](RoomConnectionManager::send_message) call.
///
/// Rejections are local policy decisions, not errors: nothing was written
/// to the transport and the log was not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendResult {
    /// One frame was written and one optimistic log entry appended.
    Sent,
    /// The text was empty after trimming whitespace; nothing happened.
    RejectedEmpty,
    /// The connection is not [`Open`](ConnectionState::Open); nothing
    /// happened. There is no send queue for disconnected periods.
    RejectedNotConnected,
}

impl SendResult {
    /// Whether the message was actually sent.
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

// ── Shared state ────────────────────────────────────────────────────

/// State shared between the manager handle and the connection loop.
struct RoomShared {
    /// Current connection state, encoded as `ConnectionState as u8`.
    state: AtomicU8,
    /// Liveness token. Bumped whenever the active connection is retired;
    /// a loop holding an older value must not mutate anything.
    generation: AtomicU64,
    /// Next [`MessageId`] to assign.
    next_message_id: AtomicU64,
    /// Append-only message log for the active room. Never mutated outside
    /// this module; readers get snapshots.
    log: StdMutex<Vec<Message>>,
}

impl RoomShared {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Idle as u8),
            generation: AtomicU64::new(0),
            next_message_id: AtomicU64::new(0),
            log: StdMutex::new(Vec::new()),
        }
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Transition state, but only if `generation` is still current.
    /// Returns `false` when the caller has been superseded.
    fn set_state(&self, generation: u64, state: ConnectionState) -> bool {
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        self.state.store(state as u8, Ordering::Release);
        true
    }

    /// Append a log entry unconditionally. Only the manager handle itself
    /// may use this (it is the generation owner by definition).
    fn append(
        &self,
        text: String,
        origin: MessageOrigin,
        delivery: Option<DeliveryState>,
    ) -> Message {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        let message = Message {
            id: MessageId(self.next_message_id.fetch_add(1, Ordering::Relaxed)),
            text,
            origin,
            sent_at: SystemTime::now(),
            delivery,
        };
        log.push(message.clone());
        message
    }

    /// Append a log entry from a connection loop, but only if `generation`
    /// is still current. The check happens under the log lock so a retire
    /// cannot slip between the check and the push.
    fn append_if_current(
        &self,
        generation: u64,
        text: String,
        origin: MessageOrigin,
    ) -> Option<Message> {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            return None;
        }
        let message = Message {
            id: MessageId(self.next_message_id.fetch_add(1, Ordering::Relaxed)),
            text,
            origin,
            sent_at: SystemTime::now(),
            delivery: None,
        };
        log.push(message.clone());
        Some(message)
    }

    fn snapshot(&self) -> Vec<Message> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_log(&self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ── Manager handle ──────────────────────────────────────────────────

/// Maintains at most one live transport per active room.
///
/// Created via [`RoomConnectionManager::new`] with a [`Connector`] (the
/// WebSocket one in production, a scripted one in tests) and a
/// [`RoomManagerConfig`]. Each call to [`open_room`](Self::open_room)
/// spawns a background connection loop and returns the event receiver for
/// that room's connection.
///
/// The message log and the transport are owned exclusively by the manager;
/// callers read log snapshots via [`messages`](Self::messages) and interact
/// through [`send_message`](Self::send_message) and
/// [`close_room`](Self::close_room).
pub struct RoomConnectionManager<C: Connector> {
    /// Dials room endpoints; shared with the connection loop.
    connector: Arc<C>,
    config: RoomManagerConfig,
    /// State shared with the connection loop.
    shared: Arc<RoomShared>,
    /// Identifier of the most recently opened room.
    current_room: Option<RoomId>,
    /// Sender half of the outgoing-frame channel to the active loop.
    cmd_tx: Option<mpsc::UnboundedSender<ChatFrame>>,
    /// Handle to the active background connection loop.
    task: Option<tokio::task::JoinHandle<()>>,
    /// Oneshot to signal the active loop to shut down gracefully.
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl<C: Connector> RoomConnectionManager<C> {
    /// Create an idle manager. No connection is made until
    /// [`open_room`](Self::open_room) is called.
    pub fn new(connector: C, config: RoomManagerConfig) -> Self {
        Self {
            connector: Arc::new(connector),
            config,
            shared: Arc::new(RoomShared::new()),
            current_room: None,
            cmd_tx: None,
            task: None,
            shutdown_tx: None,
        }
    }

    /// Open a room, replacing any active connection.
    ///
    /// If a connection is open (or still connecting) it is retired first:
    /// its liveness token is invalidated, it is signalled to close, and its
    /// task is reaped in the background. The message log is cleared only
    /// when `room` differs from the previously active identifier — closing
    /// and reopening the same room keeps the log for display.
    ///
    /// Returns the event receiver for the new connection. The first event
    /// is [`RoomEvent::Connected`] on handshake success, or
    /// [`RoomEvent::Disconnected`] if the dial fails (no retry is
    /// attempted).
    #[must_use = "the event receiver must be used to observe the connection"]
    pub fn open_room(&mut self, room: RoomId) -> mpsc::Receiver<RoomEvent> {
        self.retire_active();

        if self.current_room.as_ref() != Some(&room) {
            self.shared.clear_log();
        }

        let url = room_endpoint(&self.config.host, self.config.secure, &room);
        debug!(room = %room, url = %url, "opening room");
        self.current_room = Some(room);

        let generation = self.shared.generation.load(Ordering::Acquire);
        self.shared
            .state
            .store(ConnectionState::Connecting as u8, Ordering::Release);

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ChatFrame>();
        // Clamp capacity to at least 1 (tokio panics on 0).
        let capacity = self.config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel::<RoomEvent>(capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(connection_loop(
            Arc::clone(&self.connector),
            url,
            generation,
            Arc::clone(&self.shared),
            cmd_rx,
            event_tx,
            shutdown_rx,
        ));

        self.cmd_tx = Some(cmd_tx);
        self.task = Some(task);
        self.shutdown_tx = Some(shutdown_tx);

        event_rx
    }

    /// Close the active connection, if any.
    ///
    /// Idempotent: closing an idle or already-closed manager is a no-op.
    /// Transport shutdown is best effort — close-time errors are swallowed.
    /// The message log is retained for display; it is only discarded when a
    /// different room is opened.
    ///
    /// After this call returns, no event from the old transport can mutate
    /// the log: the liveness token is invalidated before the loop is
    /// signalled, and the task is awaited (aborted on timeout).
    pub async fn close_room(&mut self) {
        if self.task.is_none() {
            return;
        }
        debug!("room close requested");

        // Invalidate the liveness token before signalling, so nothing the
        // old loop does from here on can touch shared state.
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        self.cmd_tx = None;

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        // Await the connection loop with a timeout. If it doesn't exit in
        // time, abort it so the task cannot detach and run indefinitely.
        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.config.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("connection loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("connection loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("connection loop aborted: {join_err}");
                    }
                }
            }
        }

        self.shared
            .state
            .store(ConnectionState::Closed as u8, Ordering::Release);
    }

    /// Send a chat message to the open room.
    ///
    /// The text must be non-empty after trimming and the connection must be
    /// [`Open`](ConnectionState::Open); otherwise the call is a rejected
    /// no-op. On success exactly one `{"message": text}` frame is queued to
    /// the transport and exactly one optimistic local entry (origin
    /// [`Mine`](MessageOrigin::Mine), delivery
    /// [`Sent`](DeliveryState::Sent)) is appended to the log — no remote
    /// acknowledgment is awaited, and the delivery state never advances
    /// past `Sent`.
    pub fn send_message(&self, text: &str) -> SendResult {
        if text.trim().is_empty() {
            return SendResult::RejectedEmpty;
        }
        if self.shared.state() != ConnectionState::Open {
            return SendResult::RejectedNotConnected;
        }
        let Some(cmd_tx) = &self.cmd_tx else {
            return SendResult::RejectedNotConnected;
        };
        if cmd_tx.send(ChatFrame::new(text)).is_err() {
            // Loop exited between the state check and the queue write.
            return SendResult::RejectedNotConnected;
        }

        let message = self.shared.append(
            text.to_string(),
            MessageOrigin::Mine,
            Some(DeliveryState::Sent),
        );
        debug!(id = message.id.0, "queued outgoing message");
        SendResult::Sent
    }

    // ── State accessors ─────────────────────────────────────────────

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Identifier of the most recently opened room, if any.
    pub fn current_room(&self) -> Option<&RoomId> {
        self.current_room.as_ref()
    }

    /// A snapshot of the message log, in append order.
    ///
    /// The log itself stays owned by the manager; this clone is safe to
    /// hand to a rendering layer.
    pub fn messages(&self) -> Vec<Message> {
        self.shared.snapshot()
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Retire the active connection without waiting for it.
    ///
    /// Bumps the liveness token, signals the loop, and spawns a reaper
    /// that aborts the task if it overstays the shutdown timeout. Used on
    /// room switch, where the caller wants the new connection immediately.
    fn retire_active(&mut self) {
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        self.cmd_tx = None;

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            let timeout = self.config.shutdown_timeout;
            tokio::spawn(async move {
                if tokio::time::timeout(timeout, &mut task).await.is_err() {
                    warn!("superseded connection loop did not exit within timeout; aborting");
                    task.abort();
                }
            });
        }
    }
}

impl<C: Connector> std::fmt::Debug for RoomConnectionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomConnectionManager")
            .field("state", &self.state())
            .field("current_room", &self.current_room)
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl<C: Connector> Drop for RoomConnectionManager<C> {
    fn drop(&mut self) {
        // `Drop` is synchronous so we cannot await a graceful shutdown.
        // The only safe action is to abort the spawned task, which causes
        // the connection loop future to be dropped immediately. The
        // `shutdown_tx` oneshot is intentionally *not* sent here: sending
        // it would trigger a graceful path that calls async `transport.close()`,
        // but there is no executor context to drive it inside `Drop`.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Connection loop ─────────────────────────────────────────────────

/// Background loop for one room connection: dials the endpoint, then
/// multiplexes outgoing frames, inbound frames, and the shutdown signal via
/// `tokio::select!`.
///
/// Exits when:
/// - The shutdown signal fires (explicit close or room switch)
/// - The command channel closes (manager dropped)
/// - The transport returns `None` (backend closed the connection)
/// - A transport error occurs
/// - Its generation token goes stale
async fn connection_loop<C: Connector>(
    connector: Arc<C>,
    url: String,
    generation: u64,
    shared: Arc<RoomShared>,
    mut cmd_rx: mpsc::UnboundedReceiver<ChatFrame>,
    event_tx: mpsc::Sender<RoomEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    debug!(url = %url, "connection loop started");

    // Dial, racing the shutdown signal so a room that is switched away from
    // mid-handshake never lingers.
    let mut transport = tokio::select! {
        result = connector.connect(&url) => match result {
            Ok(transport) => transport,
            Err(e) => {
                error!("connect failed: {e}");
                shared.set_state(generation, ConnectionState::Closed);
                emit_disconnected(&event_tx, Some(format!("connect error: {e}"))).await;
                return;
            }
        },
        _ = &mut shutdown_rx => {
            debug!("shutdown requested before handshake completed");
            shared.set_state(generation, ConnectionState::Closed);
            emit_disconnected(&event_tx, Some("room closed".into())).await;
            return;
        }
    };

    if !shared.set_state(generation, ConnectionState::Open) {
        // Superseded while the dial was in flight; hand the transport back.
        debug!("connection superseded during handshake");
        let _ = transport.close().await;
        emit_disconnected(&event_tx, Some("room closed".into())).await;
        return;
    }
    emit_event(&event_tx, RoomEvent::Connected).await;

    loop {
        tokio::select! {
            // Branch 1: outgoing frame from the manager handle
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(frame) => {
                        match frame.encode() {
                            Ok(json) => {
                                if let Err(e) = transport.send(json).await {
                                    error!("transport send error: {e}");
                                    shared.set_state(generation, ConnectionState::Closed);
                                    emit_disconnected(
                                        &event_tx,
                                        Some(format!("transport send error: {e}")),
                                    ).await;
                                    break;
                                }
                            }
                            Err(e) => {
                                error!("failed to encode chat frame: {e}");
                                // Encoding errors are programming bugs; don't kill the loop.
                            }
                        }
                    }
                    // Command channel closed — manager handle dropped.
                    None => {
                        debug!("command channel closed, shutting down connection loop");
                        let _ = transport.close().await;
                        shared.set_state(generation, ConnectionState::Closed);
                        emit_disconnected(&event_tx, Some("room closed".into())).await;
                        break;
                    }
                }
            }

            // Branch 2: shutdown signal
            _ = &mut shutdown_rx => {
                debug!("shutdown signal received");
                // Best effort: close-time transport errors are swallowed.
                let _ = transport.close().await;
                shared.set_state(generation, ConnectionState::Closed);
                emit_disconnected(&event_tx, Some("room closed".into())).await;
                break;
            }

            // Branch 3: inbound frame from the backend
            incoming = transport.recv() => {
                match incoming {
                    Some(Ok(text)) => {
                        match ChatFrame::decode(&text) {
                            Some(frame) => {
                                match shared.append_if_current(
                                    generation,
                                    frame.message,
                                    MessageOrigin::Remote,
                                ) {
                                    Some(message) => {
                                        emit_event(
                                            &event_tx,
                                            RoomEvent::MessageReceived(message),
                                        ).await;
                                    }
                                    None => {
                                        // Stale transport — the room moved on.
                                        debug!("discarding frame from superseded connection");
                                        let _ = transport.close().await;
                                        emit_disconnected(
                                            &event_tx,
                                            Some("room closed".into()),
                                        ).await;
                                        break;
                                    }
                                }
                            }
                            None => {
                                warn!("dropping undecodable frame: {text}");
                            }
                        }
                    }
                    Some(Err(e)) => {
                        error!("transport receive error: {e}");
                        shared.set_state(generation, ConnectionState::Closed);
                        emit_disconnected(
                            &event_tx,
                            Some(format!("transport receive error: {e}")),
                        ).await;
                        break;
                    }
                    // Transport closed cleanly by the backend.
                    None => {
                        debug!("transport closed by backend");
                        shared.set_state(generation, ConnectionState::Closed);
                        emit_disconnected(&event_tx, None).await;
                        break;
                    }
                }
            }
        }
    }

    debug!("connection loop exited");
}

/// Emit an event to the event channel. If the channel is full, log a warning
/// and drop the event to avoid blocking the connection loop.
async fn emit_event(event_tx: &mpsc::Sender<RoomEvent>, event: RoomEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!(
                "event channel full, dropping event: {:?}",
                std::mem::discriminant(&dropped)
            );
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("event channel closed, receiver dropped");
        }
    }
}

/// Emit a [`Disconnected`](RoomEvent::Disconnected) event.
///
/// Uses `send().await` (blocking) instead of `try_send` because
/// `Disconnected` is always the last event on the channel and must never be
/// silently dropped.
async fn emit_disconnected(event_tx: &mpsc::Sender<RoomEvent>, reason: Option<String>) {
    if event_tx
        .send(RoomEvent::Disconnected { reason })
        .await
        .is_err()
    {
        debug!("event channel closed, receiver dropped");
    }
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
    fn config_defaults() {
        let config = RoomManagerConfig::new("chat.test");
        assert_eq!(config.host, "chat.test");
        assert!(!config.secure);
        assert_eq!(config.event_channel_capacity, 256);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn config_builder_methods() {
        let config = RoomManagerConfig::new("chat.test")
            .with_secure(true)
            .with_event_channel_capacity(512)
            .with_shutdown_timeout(Duration::from_secs(5));
        assert!(config.secure);
        assert_eq!(config.event_channel_capacity, 512);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn event_channel_capacity_is_clamped_to_one() {
        let config = RoomManagerConfig::new("chat.test").with_event_channel_capacity(0);
        assert_eq!(config.event_channel_capacity, 1);
    }

    #[test]
    fn connection_state_round_trips_through_u8() {
        for state in [
            ConnectionState::Idle,
            ConnectionState::Connecting,
            ConnectionState::Open,
            ConnectionState::Closed,
        ] {
            assert_eq!(ConnectionState::from_u8(state as u8), state);
        }
        // Unknown encodings collapse to the terminal state.
        assert_eq!(ConnectionState::from_u8(200), ConnectionState::Closed);
    }

    #[test]
    fn send_result_reports_sent() {
        assert!(SendResult::Sent.is_sent());
        assert!(!SendResult::RejectedEmpty.is_sent());
        assert!(!SendResult::RejectedNotConnected.is_sent());
    }
}
