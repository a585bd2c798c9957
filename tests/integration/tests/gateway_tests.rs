//! Gateway integration tests
//!
//! Drive a full client through the scripted transport and manual scheduler.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use chord_client::{ClientEvent, ConnectionStatus, User};
use integration_tests::{fixtures, test_config, TestClient, RECONNECT_DELAY, TEST_TOKEN};
use serde_json::json;

const HEARTBEAT: Duration = Duration::from_millis(41_250);

// ============================================================================
// Handshake & Heartbeat
// ============================================================================

#[test]
fn test_identify_sent_when_socket_opens() {
    let harness = TestClient::new();
    harness.client.login(Some(TEST_TOKEN)).unwrap();
    assert_eq!(harness.client.status(), ConnectionStatus::Connecting);
    assert!(harness.transport.sent().is_empty());

    harness.transport.open_socket();

    let identify = harness.transport.sent_with_op(2);
    assert_eq!(identify.len(), 1);
    let d = &identify[0]["d"];
    assert_eq!(d["token"], TEST_TOKEN);
    assert_eq!(d["intents"], 3_276_799);
    assert!(d["properties"]["os"].is_string());
    assert!(d["properties"]["browser"].is_string());
    assert!(d["properties"]["device"].is_string());
}

#[test]
fn test_hello_schedules_heartbeat_at_interval() {
    let harness = TestClient::new();
    harness.connect(41_250);

    assert_eq!(harness.client.status(), ConnectionStatus::Connected);
    assert_eq!(harness.scheduler.intervals(), vec![HEARTBEAT]);
    assert_eq!(harness.scheduler.active(HEARTBEAT), 1);
}

#[test]
fn test_heartbeat_request_sends_current_sequence_immediately() {
    let harness = TestClient::new();
    harness.connect(41_250);
    harness
        .transport
        .receive(fixtures::dispatch("TYPING_START", 5, json!({})));
    harness.transport.clear_sent();

    harness.transport.receive(fixtures::heartbeat_request());

    assert_eq!(
        harness.transport.sent_with_op(1),
        vec![json!({ "op": 1, "d": 5 })]
    );
}

#[test]
fn test_heartbeat_tick_before_any_dispatch_sends_null() {
    let harness = TestClient::new();
    harness.connect(41_250);

    assert_eq!(harness.scheduler.fire(HEARTBEAT), 1);

    let heartbeats = harness.transport.sent_with_op(1);
    assert_eq!(heartbeats.len(), 1);
    assert!(heartbeats[0]["d"].is_null());
}

#[test]
fn test_missed_ack_is_tolerated_by_default() {
    let harness = TestClient::new();
    harness.connect(41_250);

    harness.scheduler.fire(HEARTBEAT);
    harness.scheduler.fire(HEARTBEAT);

    assert_eq!(harness.transport.sent_with_op(1).len(), 2);
    assert_eq!(harness.client.status(), ConnectionStatus::Connected);
}

#[test]
fn test_zombie_detection_reconnects_on_missed_ack() {
    let config = chord_common::ClientConfig {
        detect_zombie_connections: true,
        ..test_config()
    };
    let harness = TestClient::with_config(config);
    harness.connect(41_250);

    harness.scheduler.fire(HEARTBEAT);
    harness.transport.receive(fixtures::heartbeat_ack());
    harness.scheduler.fire(HEARTBEAT);
    assert_eq!(harness.client.status(), ConnectionStatus::Connected);

    // Second heartbeat never acknowledged
    harness.scheduler.fire(HEARTBEAT);

    assert_eq!(harness.client.status(), ConnectionStatus::Reconnecting);
    assert_eq!(harness.transport.closes(), vec![4900]);
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);
}

// ============================================================================
// Sequence Tracking
// ============================================================================

#[test]
fn test_sequence_follows_every_dispatch() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    assert_eq!(harness.client.sequence(), Some(1));

    // Applied, ignored and anomalous dispatches all advance the sequence
    harness.transport.receive(fixtures::dispatch(
        "CHANNEL_CREATE",
        2,
        fixtures::text_channel("c1", None),
    ));
    assert_eq!(harness.client.sequence(), Some(2));

    harness
        .transport
        .receive(fixtures::dispatch("PRESENCE_UPDATE", 3, json!({})));
    assert_eq!(harness.client.sequence(), Some(3));

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        4,
        fixtures::message("m1", "missing", ("u2", "alice"), "hi"),
    ));
    assert_eq!(harness.client.sequence(), Some(4));

    harness
        .transport
        .receive(fixtures::dispatch("MESSAGE_DELETE", 5, json!({ "bad": true })));
    assert_eq!(harness.client.sequence(), Some(5));
}

#[test]
fn test_unknown_event_type_is_silent() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.clear_events();

    harness
        .transport
        .receive(fixtures::dispatch("SOME_FUTURE_EVENT", 2, json!({ "x": 1 })));

    assert!(harness.events().is_empty());
    assert_eq!(harness.client.status(), ConnectionStatus::Connected);
}

#[test]
fn test_malformed_frame_reports_debug() {
    let harness = TestClient::new();
    harness.connect(41_250);
    harness.clear_events();

    harness.transport.receive("{not json");

    assert_eq!(harness.debug_messages().len(), 1);
    assert_eq!(harness.client.status(), ConnectionStatus::Connected);
}

// ============================================================================
// READY / GUILD_CREATE
// ============================================================================

#[test]
fn test_ready_caches_user_and_guild_placeholders() {
    let harness = TestClient::new();
    harness.connect(41_250);
    harness.transport.receive(fixtures::dispatch(
        "READY",
        1,
        json!({
            "user": { "id": "1", "username": "bot" },
            "guilds": [{ "id": "g1" }, { "id": "g2" }]
        }),
    ));

    let client = &harness.client;
    assert!(client.is_ready());
    assert!(client.ready_time().is_some());

    let me = client.current_user().unwrap();
    assert_eq!(me.id.as_str(), "1");
    assert_eq!(me.username, "bot");
    assert_eq!(client.user("1"), Some(me.clone()));

    for id in ["g1", "g2"] {
        let guild = client.guild(id).unwrap();
        assert!(guild.unavailable);
    }

    let ready: Vec<User> = harness
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ClientEvent::Ready(user) => Some(user),
            _ => None,
        })
        .collect();
    assert_eq!(ready, vec![me]);
}

#[test]
fn test_ready_stores_session() {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);

    assert_eq!(harness.client.session_id().as_deref(), Some("session-1"));
    assert_eq!(
        harness.client.resume_url().as_deref(),
        Some("wss://resume.gateway.test")
    );
}

#[test]
fn test_guild_create_mirrors_channels_and_users() {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);

    harness.transport.receive(fixtures::dispatch(
        "GUILD_CREATE",
        2,
        fixtures::guild_create("g1", ["c1", "c2"], ("u1", "alice")),
    ));

    let client = &harness.client;
    let guild = client.guild("g1").unwrap();
    assert!(!guild.unavailable);
    assert_eq!(guild.name.as_deref(), Some("Test Guild"));
    assert_eq!(guild.members.len(), 1);
    assert_eq!(guild.roles.len(), 1);

    for id in ["c1", "c2"] {
        assert!(guild.channels.contains(id));
        let channel = client.channel(id).unwrap();
        assert_eq!(channel.guild_id.as_ref().map(|g| g.as_str()), Some("g1"));
    }

    assert_eq!(client.user("u1").map(|u| u.username), Some("alice".to_string()));
}

#[test]
fn test_guild_delete_removes_guild_and_channels() {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);
    harness.transport.receive(fixtures::dispatch(
        "GUILD_CREATE",
        2,
        fixtures::guild_create("g1", ["c1", "c2"], ("u1", "alice")),
    ));

    harness
        .transport
        .receive(fixtures::dispatch("GUILD_DELETE", 3, json!({ "id": "g1" })));

    assert!(harness.client.guild("g1").is_none());
    assert!(harness.client.channel("c1").is_none());
    assert!(harness.client.channel("c2").is_none());
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn test_message_for_unknown_channel_changes_nothing() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.clear_events();
    let users_before = harness.client.with_store(|store| store.users.len());

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        2,
        fixtures::message("m1", "nowhere", ("u2", "alice"), "hi"),
    ));

    assert!(harness.non_debug_events().is_empty());
    assert_eq!(harness.debug_messages().len(), 1);
    assert!(harness.debug_messages()[0].contains("nowhere"));
    assert_eq!(
        harness.client.with_store(|store| store.users.len()),
        users_before
    );
    assert!(harness.client.user("u2").is_none());
}

#[test]
fn test_message_create_caches_and_notifies() {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);
    harness.transport.receive(fixtures::dispatch(
        "GUILD_CREATE",
        2,
        fixtures::guild_create("g1", ["c1", "c2"], ("u1", "alice")),
    ));
    harness.clear_events();

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "hello"),
    ));

    let cached = harness.client.message("c1", "m1").unwrap();
    assert_eq!(cached.content, "hello");
    assert_eq!(cached.guild_id.as_ref().map(|g| g.as_str()), Some("g1"));
    assert_eq!(
        harness.events(),
        vec![ClientEvent::Message(Box::new(cached))]
    );
}

#[test]
fn test_message_delete_removes_exactly_that_message() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.transport.receive(fixtures::dispatch(
        "CHANNEL_CREATE",
        2,
        fixtures::text_channel("c1", None),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "first"),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        4,
        fixtures::message("m2", "c1", ("u1", "alice"), "second"),
    ));
    let before = harness.client.message("c1", "m1").unwrap();
    harness.clear_events();

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_DELETE",
        5,
        fixtures::message_delete("m1", "c1"),
    ));

    assert!(harness.client.message("c1", "m1").is_none());
    assert!(harness.client.message("c1", "m2").is_some());
    assert_eq!(
        harness.events(),
        vec![ClientEvent::MessageDelete(Box::new(before))]
    );
}

#[test]
fn test_message_delete_for_unknown_message_is_debug_only() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.transport.receive(fixtures::dispatch(
        "CHANNEL_CREATE",
        2,
        fixtures::text_channel("c1", None),
    ));
    harness.clear_events();

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_DELETE",
        3,
        fixtures::message_delete("m9", "c1"),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_DELETE",
        4,
        fixtures::message_delete("m9", "c404"),
    ));

    assert!(harness.non_debug_events().is_empty());
    assert_eq!(harness.debug_messages().len(), 2);
}

#[test]
fn test_message_update_edits_cached_message() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.transport.receive(fixtures::dispatch(
        "CHANNEL_CREATE",
        2,
        fixtures::text_channel("c1", None),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "draft"),
    ));

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_UPDATE",
        4,
        json!({
            "id": "m1",
            "channel_id": "c1",
            "content": "final",
            "edited_timestamp": "2024-03-01T12:05:00+00:00"
        }),
    ));

    let message = harness.client.message("c1", "m1").unwrap();
    assert_eq!(message.content, "final");
    assert!(message.is_edited());
    assert_eq!(message.author.username, "alice");
}

// ============================================================================
// Reconnection
// ============================================================================

#[test]
fn test_normal_close_never_reconnects() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);

    harness.transport.remote_close(1000);

    assert_eq!(harness.client.status(), ConnectionStatus::Disconnected);
    assert!(!harness.client.is_ready());
    assert_eq!(harness.scheduler.active_total(), 0);
    assert_eq!(harness.scheduler.fire(RECONNECT_DELAY), 0);
    assert_eq!(harness.transport.opens(), 1);
}

#[test]
fn test_abnormal_close_retries_until_ready() {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);

    assert_eq!(harness.client.sequence(), Some(1));
    harness.transport.remote_close(4000);
    assert_eq!(harness.client.status(), ConnectionStatus::Reconnecting);
    assert!(!harness.client.is_ready());
    assert_eq!(harness.client.sequence(), None);
    assert_eq!(harness.scheduler.active(HEARTBEAT), 0);
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);

    harness.scheduler.fire(RECONNECT_DELAY);
    assert_eq!(harness.transport.opens(), 2);
    assert_eq!(harness.client.status(), ConnectionStatus::Connecting);

    // A tick during the handshake does not abandon it
    harness.scheduler.fire(RECONNECT_DELAY);
    assert_eq!(harness.transport.opens(), 2);

    // That attempt fails; the retry keeps firing
    harness.transport.remote_close(1006);
    harness.scheduler.fire(RECONNECT_DELAY);
    assert_eq!(harness.transport.opens(), 3);

    harness.transport.open_socket();
    harness.transport.receive(fixtures::hello(41_250));
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);

    // The new connection starts its heartbeats without the old sequence
    harness.scheduler.fire(HEARTBEAT);
    let heartbeats = harness.transport.sent_with_op(1);
    assert!(heartbeats.last().unwrap()["d"].is_null());

    harness.transport.receive(fixtures::dispatch(
        "READY",
        1,
        fixtures::ready("1", "bot", &["g1"]),
    ));

    assert!(harness.client.is_ready());
    assert_eq!(harness.client.status(), ConnectionStatus::Connected);
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 0);
    assert_eq!(harness.scheduler.active(HEARTBEAT), 1);
    assert!(harness
        .debug_messages()
        .iter()
        .any(|text| text == "Reconnected"));

    // Identify was sent on both connections
    assert_eq!(harness.transport.sent_with_op(2).len(), 2);
}

#[test]
fn test_repeated_abnormal_close_schedules_one_retry() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);

    harness.transport.remote_close(1006);
    harness.scheduler.fire(RECONNECT_DELAY);
    harness.transport.open_socket();
    harness.transport.remote_close(1006);

    let retries = harness
        .scheduler
        .intervals()
        .into_iter()
        .filter(|interval| *interval == RECONNECT_DELAY)
        .count();
    assert_eq!(retries, 1);
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);
}

#[test]
fn test_reconnect_and_invalid_session_opcodes_force_reconnect() {
    for frame in [fixtures::reconnect(), fixtures::invalid_session()] {
        let harness = TestClient::new();
        harness.connect_ready(&[]);

        harness.transport.receive(frame);

        assert_eq!(harness.transport.closes(), vec![4900]);
        assert_eq!(harness.client.status(), ConnectionStatus::Reconnecting);
        assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);
        assert!(!harness.debug_messages().is_empty());
    }
}

#[test]
fn test_close_cancels_pending_timers() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.transport.remote_close(4000);
    assert_eq!(harness.scheduler.active(RECONNECT_DELAY), 1);

    harness.client.close();

    assert_eq!(harness.client.status(), ConnectionStatus::Disconnected);
    assert_eq!(harness.scheduler.active_total(), 0);
    assert_eq!(harness.scheduler.fire(RECONNECT_DELAY), 0);
    assert_eq!(harness.transport.closes().last(), Some(&1000));
    assert_eq!(harness.transport.opens(), 1);
}

#[test]
fn test_login_after_close_reconnects() {
    let harness = TestClient::new();
    harness.connect_ready(&[]);
    harness.client.close();

    harness.client.login(None).unwrap();
    assert_eq!(harness.transport.opens(), 2);
    assert_eq!(harness.client.status(), ConnectionStatus::Connecting);
}
