#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Integration tests for the room connection manager.
//!
//! Uses the shared `MockConnector` from `tests/common` to script transport
//! sessions and verify the full lifecycle: resolution-to-dial, optimistic
//! sends, inbound ordering, room switching, and stale-transport
//! suppression.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use chatroom_client::{
    resolve_room_id, ConnectionState, DeliveryState, MessageOrigin, RoomConnectionManager,
    RoomEvent, RoomId, RoomManagerConfig, SendResult,
};
use tokio::sync::mpsc;

use common::{failing_session, session, MockConnector};

// ════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════

fn manager(connector: MockConnector) -> RoomConnectionManager<MockConnector> {
    let config = RoomManagerConfig::new("chat.test")
        .with_secure(true)
        .with_shutdown_timeout(Duration::from_millis(200));
    RoomConnectionManager::new(connector, config)
}

async fn expect_connected(events: &mut mpsc::Receiver<RoomEvent>) {
    let event = events.recv().await.expect("expected Connected event");
    assert!(
        matches!(event, RoomEvent::Connected),
        "first event should be Connected, got {event:?}"
    );
}

async fn expect_message(events: &mut mpsc::Receiver<RoomEvent>, text: &str) {
    let event = events.recv().await.expect("expected MessageReceived event");
    let RoomEvent::MessageReceived(message) = event else {
        panic!("expected MessageReceived, got {event:?}");
    };
    assert_eq!(message.text, text);
}

// ════════════════════════════════════════════════════════════════════
// Resolution to dial
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn resolved_implicit_room_dials_sorted_endpoint() {
    let (transport, _handle) = session();
    let connector = MockConnector::new(vec![transport]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mut mgr = manager(connector);

    let room = resolve_room_id("/live-chat", Some("zelda"), Some("alice"))
        .expect("both participants present");
    assert_eq!(room.as_str(), "alice_zelda");

    let mut events = mgr.open_room(room);
    expect_connected(&mut events).await;

    assert_eq!(
        dialed.lock().unwrap().as_slice(),
        ["wss://chat.test/ws/chat/alice_zelda/"]
    );

    mgr.close_room().await;
}

#[tokio::test]
async fn resolved_explicit_room_dials_token_endpoint() {
    let (transport, _handle) = session();
    let connector = MockConnector::new(vec![transport]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mut mgr = manager(connector);

    // URL form wins even with a participant pairing available.
    let room =
        resolve_room_id("/chat/sala1208", Some("u1"), Some("u2")).expect("explicit token present");
    assert_eq!(room.as_str(), "sala1208");

    let mut events = mgr.open_room(room);
    expect_connected(&mut events).await;

    assert_eq!(
        dialed.lock().unwrap().as_slice(),
        ["wss://chat.test/ws/chat/sala1208/"]
    );

    mgr.close_room().await;
}

#[tokio::test]
async fn unresolvable_room_means_manager_stays_idle() {
    let connector = MockConnector::new(vec![]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mgr = manager(connector);

    assert!(resolve_room_id("/live-chat", Some("me"), None).is_none());
    assert!(resolve_room_id("/live-chat", None, Some("partner")).is_none());

    // Nothing resolved, nothing opened, nothing dialed.
    assert_eq!(mgr.state(), ConnectionState::Idle);
    assert!(mgr.current_room().is_none());
    assert!(mgr.messages().is_empty());
    assert!(dialed.lock().unwrap().is_empty());
}

// ════════════════════════════════════════════════════════════════════
// Send path
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn optimistic_send_writes_one_frame_and_one_entry() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    assert_eq!(mgr.send_message("hello"), SendResult::Sent);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(handle.sent_frames(), [r#"{"message":"hello"}"#]);
    let log = mgr.messages();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].text, "hello");
    assert_eq!(log[0].origin, MessageOrigin::Mine);
    // Delivery never advances past Sent — receipts are not wired up.
    assert_eq!(log[0].delivery, Some(DeliveryState::Sent));

    mgr.close_room().await;
}

#[tokio::test]
async fn rejected_sends_touch_neither_log_nor_wire() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    // Not yet open: everything is rejected locally.
    assert_eq!(mgr.send_message("hi"), SendResult::RejectedNotConnected);

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    assert_eq!(mgr.send_message(""), SendResult::RejectedEmpty);
    assert_eq!(mgr.send_message("   "), SendResult::RejectedEmpty);
    assert_eq!(mgr.send_message("\t\n"), SendResult::RejectedEmpty);

    mgr.close_room().await;
    assert_eq!(mgr.send_message("hi"), SendResult::RejectedNotConnected);

    assert!(mgr.messages().is_empty());
    assert!(handle.sent_frames().is_empty());
}

// ════════════════════════════════════════════════════════════════════
// Round trip and ordering
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn round_trip_receive_then_send() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    handle.inject(r#"{"message":"hi there"}"#);
    expect_message(&mut events, "hi there").await;

    assert_eq!(mgr.send_message("yo"), SendResult::Sent);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let log = mgr.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].text, "hi there");
    assert_eq!(log[0].origin, MessageOrigin::Remote);
    assert!(log[0].delivery.is_none());
    assert_eq!(log[1].text, "yo");
    assert_eq!(log[1].origin, MessageOrigin::Mine);
    assert_eq!(log[1].delivery, Some(DeliveryState::Sent));

    assert_eq!(handle.sent_frames(), [r#"{"message":"yo"}"#]);

    mgr.close_room().await;
}

#[tokio::test]
async fn inbound_frames_append_in_arrival_order() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    for text in ["one", "two", "three", "four"] {
        handle.inject(&format!(r#"{{"message":"{text}"}}"#));
    }
    for text in ["one", "two", "three", "four"] {
        expect_message(&mut events, text).await;
    }

    let texts: Vec<_> = mgr.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, ["one", "two", "three", "four"]);

    mgr.close_room().await;
}

#[tokio::test]
async fn malformed_frames_are_dropped_without_disturbing_the_log() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    handle.inject("not json at all");
    handle.inject(r#"{"note":"no message field"}"#);
    handle.inject(r#"[1,2,3]"#);
    handle.inject(r#"{"message":123}"#);
    handle.inject(r#"{"message":"the only good one"}"#);

    expect_message(&mut events, "the only good one").await;
    assert_eq!(mgr.messages().len(), 1);

    mgr.close_room().await;
}

// ════════════════════════════════════════════════════════════════════
// Room switching and stale transports
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn switch_leaves_exactly_one_transport_open() {
    let (t1, h1) = session();
    let (t2, h2) = session();
    let connector = MockConnector::new(vec![t1, t2]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mut mgr = manager(connector);

    let mut events1 = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events1).await;
    handle_message(&h1, &mut events1, "from r1").await;

    let mut events2 = mgr.open_room(RoomId::from("r2"));
    expect_connected(&mut events2).await;

    // Old transport closed, new one open, log restarted.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h1.closed.load(Ordering::Relaxed));
    assert!(!h2.closed.load(Ordering::Relaxed));
    assert_eq!(mgr.state(), ConnectionState::Open);
    assert_eq!(dialed.lock().unwrap().len(), 2);

    // The old room's receiver ends with Disconnected.
    let event = events1.recv().await.expect("final event for old room");
    assert!(matches!(event, RoomEvent::Disconnected { .. }));

    // A frame arriving on the superseded transport never reaches the log.
    h1.inject(r#"{"message":"ghost"}"#);
    handle_message(&h2, &mut events2, "real").await;
    let texts: Vec<_> = mgr.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, ["real"]);

    mgr.close_room().await;
}

#[tokio::test]
async fn rapid_switching_settles_on_last_room() {
    let (t1, _h1) = session();
    let (t2, _h2) = session();
    let (t3, h3) = session();
    // Keyed sessions: back-to-back opens dial concurrently, so connect
    // order is up to the scheduler.
    let connector =
        MockConnector::new_keyed(vec![("/chat/a/", t1), ("/chat/b/", t2), ("/chat/c/", t3)]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mut mgr = manager(connector);

    let _e1 = mgr.open_room(RoomId::from("a"));
    let _e2 = mgr.open_room(RoomId::from("b"));
    let mut events = mgr.open_room(RoomId::from("c"));
    expect_connected(&mut events).await;

    assert_eq!(mgr.current_room().map(RoomId::as_str), Some("c"));
    assert_eq!(mgr.state(), ConnectionState::Open);

    handle_message(&h3, &mut events, "settled").await;
    let texts: Vec<_> = mgr.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, ["settled"]);

    // Superseded rooms may or may not have gotten as far as dialing, but
    // the last room always does.
    {
        let dialed = dialed.lock().unwrap();
        assert!(dialed.iter().any(|url| url.contains("/chat/c/")));
    }

    mgr.close_room().await;
}

// ════════════════════════════════════════════════════════════════════
// Failure paths
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn dial_failure_is_terminal_for_the_room() {
    let connector = MockConnector::new(vec![failing_session("refused")]);
    let dialed = std::sync::Arc::clone(&connector.dialed);
    let mut mgr = manager(connector);

    let mut events = mgr.open_room(RoomId::from("r1"));
    let event = events.recv().await.expect("event");
    let RoomEvent::Disconnected { reason } = event else {
        panic!("expected Disconnected, got {event:?}");
    };
    assert!(reason.expect("dial failures carry a reason").contains("refused"));
    assert_eq!(mgr.state(), ConnectionState::Closed);

    // Exactly one dial attempt — no automatic retry — and no queueing:
    // sends stay rejected.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dialed.lock().unwrap().len(), 1);
    assert_eq!(mgr.send_message("hi"), SendResult::RejectedNotConnected);
}

#[tokio::test]
async fn receive_error_transitions_to_closed() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    handle.inject_error("boom");

    let event = events.recv().await.expect("event");
    let RoomEvent::Disconnected { reason } = event else {
        panic!("expected Disconnected, got {event:?}");
    };
    assert!(reason.expect("errors carry a reason").contains("boom"));
    assert_eq!(mgr.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn remote_close_keeps_log_for_display() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;
    handle_message(&handle, &mut events, "before close").await;

    drop(handle); // clean remote close

    let event = events.recv().await.expect("event");
    assert!(matches!(event, RoomEvent::Disconnected { reason: None }));
    assert_eq!(mgr.state(), ConnectionState::Closed);

    // The log persists until the identifier changes.
    assert_eq!(mgr.messages().len(), 1);
}

// ════════════════════════════════════════════════════════════════════
// Close and teardown
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn close_room_is_idempotent() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    mgr.close_room().await;
    assert_eq!(mgr.state(), ConnectionState::Closed);
    assert!(handle.closed.load(Ordering::Relaxed));

    // Closing again (and closing a never-opened manager) is a no-op.
    mgr.close_room().await;
    assert_eq!(mgr.state(), ConnectionState::Closed);

    let mut idle = manager(MockConnector::new(vec![]));
    idle.close_room().await;
    assert_eq!(idle.state(), ConnectionState::Idle);
}

#[tokio::test]
async fn close_emits_final_disconnected() {
    let (transport, _handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    mgr.close_room().await;

    let event = events.recv().await.expect("final event");
    let RoomEvent::Disconnected { reason } = event else {
        panic!("expected Disconnected, got {event:?}");
    };
    assert_eq!(reason.as_deref(), Some("room closed"));
}

#[tokio::test]
async fn reopening_same_room_keeps_log() {
    let (t1, h1) = session();
    let (t2, _h2) = session();
    let mut mgr = manager(MockConnector::new(vec![t1, t2]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;
    handle_message(&h1, &mut events, "kept").await;

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    let texts: Vec<_> = mgr.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, ["kept"]);

    mgr.close_room().await;
}

#[tokio::test]
async fn log_survives_close_until_room_changes() {
    let (t1, h1) = session();
    let (t2, _h2) = session();
    let mut mgr = manager(MockConnector::new(vec![t1, t2]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;
    handle_message(&h1, &mut events, "shown while closed").await;

    mgr.close_room().await;
    assert_eq!(mgr.messages().len(), 1);

    let _events = mgr.open_room(RoomId::from("r2"));
    assert!(mgr.messages().is_empty());

    mgr.close_room().await;
}

#[tokio::test]
async fn drop_without_close_ends_event_stream() {
    let (transport, _handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    drop(mgr);

    // The loop is aborted; the event channel closes without hanging.
    while events.recv().await.is_some() {}
}

// ════════════════════════════════════════════════════════════════════
// Backpressure and bookkeeping
// ════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn lagging_consumer_loses_events_but_never_log_entries() {
    let (transport, handle) = session();
    let config = RoomManagerConfig::new("chat.test")
        .with_secure(true)
        .with_event_channel_capacity(1)
        .with_shutdown_timeout(Duration::from_millis(200));
    let mut mgr = RoomConnectionManager::new(MockConnector::new(vec![transport]), config);

    // Do not drain: the Connected event occupies the only channel slot.
    let mut events = mgr.open_room(RoomId::from("r1"));

    handle.inject(r#"{"message":"one"}"#);
    handle.inject(r#"{"message":"two"}"#);
    handle.inject(r#"{"message":"three"}"#);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Every frame reached the log even though its event was shed.
    let texts: Vec<_> = mgr.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, ["one", "two", "three"]);

    // The channel holds only the Connected event; the MessageReceived
    // events were dropped while it was full.
    expect_connected(&mut events).await;

    // Disconnected is never shed — it is still the final event.
    mgr.close_room().await;
    let event = events.recv().await.expect("final event");
    assert!(matches!(event, RoomEvent::Disconnected { .. }));
    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn message_ids_are_unique_and_increasing() {
    let (transport, handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    assert_eq!(mgr.send_message("a"), SendResult::Sent);
    handle_message(&handle, &mut events, "b").await;
    assert_eq!(mgr.send_message("c"), SendResult::Sent);

    let ids: Vec<_> = mgr.messages().into_iter().map(|m| m.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids, sorted, "ids must be strictly increasing");

    mgr.close_room().await;
}

#[tokio::test]
async fn debug_output_reports_state() {
    let (transport, _handle) = session();
    let mut mgr = manager(MockConnector::new(vec![transport]));

    let mut events = mgr.open_room(RoomId::from("r1"));
    expect_connected(&mut events).await;

    let debug_str = format!("{mgr:?}");
    assert!(debug_str.contains("RoomConnectionManager"));
    assert!(debug_str.contains("state"));

    mgr.close_room().await;
}

// ════════════════════════════════════════════════════════════════════
// Shared helper
// ════════════════════════════════════════════════════════════════════

/// Inject a frame and wait for its event so the log is settled.
async fn handle_message(
    handle: &common::SessionHandle,
    events: &mut mpsc::Receiver<RoomEvent>,
    text: &str,
) {
    handle.inject(&format!(r#"{{"message":"{text}"}}"#));
    expect_message(events, text).await;
}
