//! Client facade integration tests
//!
//! Login rules, listener delivery, and the REST operations against a recording
//! HTTP client.
//!
//! Run with: cargo test -p integration-tests --test client_tests

use std::sync::Arc;

use chord_client::{
    ClientEvent, ConnectionStatus, Embed, FileAttachment, MessageOptions, Method, RequestOptions,
};
use integration_tests::{fixtures, test_config, TestClient, TEST_TOKEN};
use parking_lot::Mutex;
use serde_json::json;

/// Ready client with guild g1 and channels c1/c2
fn ready_harness() -> TestClient {
    let harness = TestClient::new();
    harness.connect_ready(&["g1"]);
    harness.transport.receive(fixtures::dispatch(
        "GUILD_CREATE",
        2,
        fixtures::guild_create("g1", ["c1", "c2"], ("u1", "alice")),
    ));
    harness
}

// ============================================================================
// Login
// ============================================================================

#[test]
fn test_login_without_any_token_is_auth_error() {
    let harness = TestClient::new();
    let err = harness.client.login(None).unwrap_err();

    assert_eq!(err.code(), "AUTH_ERROR");
    assert_eq!(harness.transport.opens(), 0);
    assert_eq!(harness.client.status(), ConnectionStatus::Disconnected);
}

#[test]
fn test_login_uses_configured_token() {
    let harness = TestClient::with_config(test_config().with_token("from-config"));
    harness.client.login(None).unwrap();
    harness.transport.open_socket();

    assert_eq!(harness.transport.sent_with_op(2)[0]["d"]["token"], "from-config");
}

#[test]
fn test_login_while_connected_is_state_error() {
    let harness = TestClient::new();
    harness.client.login(Some(TEST_TOKEN)).unwrap();

    let err = harness.client.login(Some(TEST_TOKEN)).unwrap_err();
    assert_eq!(err.code(), "STATE_ERROR");
    assert_eq!(harness.transport.opens(), 1);
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_listeners_run_in_registration_order() {
    let harness = ready_harness();
    let order = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = order.clone();
        harness
            .client
            .on_message(move |message| order.lock().push((label, message.id.to_string())));
    }

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "hi"),
    ));

    assert_eq!(
        *order.lock(),
        vec![
            ("first", "m1".to_string()),
            ("second", "m1".to_string()),
            ("third", "m1".to_string())
        ]
    );
}

#[test]
fn test_typed_listeners() {
    let harness = TestClient::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let seen = seen.clone();
        harness
            .client
            .on_ready(move |user| seen.lock().push(format!("ready:{}", user.id)));
    }
    {
        let seen = seen.clone();
        harness
            .client
            .on_message_delete(move |message| seen.lock().push(format!("delete:{}", message.id)));
    }

    harness.connect_ready(&[]);
    harness.transport.receive(fixtures::dispatch(
        "CHANNEL_CREATE",
        2,
        fixtures::text_channel("c1", None),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "hi"),
    ));
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_DELETE",
        4,
        fixtures::message_delete("m1", "c1"),
    ));

    assert_eq!(*seen.lock(), vec!["ready:1", "delete:m1"]);
}

#[test]
fn test_subscribe_receives_notifications() {
    let harness = ready_harness();
    let mut events = harness.client.subscribe();

    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "hi"),
    ));

    match events.try_recv() {
        Ok(ClientEvent::Message(message)) => assert_eq!(message.content, "hi"),
        other => panic!("expected a message notification, got {other:?}"),
    }
}

// ============================================================================
// REST
// ============================================================================

#[tokio::test]
async fn test_request_before_login_is_state_error() {
    let harness = TestClient::new();
    let err = harness
        .client
        .send_message("c1", "hello")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "STATE_ERROR");
    assert!(harness.http.requests().is_empty());
}

#[tokio::test]
async fn test_send_message_posts_and_builds_message() {
    let harness = ready_harness();
    harness
        .http
        .respond(200, fixtures::message("m5", "c1", ("1", "bot"), "hello"));

    let message = harness.client.send_message("c1", "hello").await.unwrap();

    let request = harness.http.last_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "http://api.test/channels/c1/messages");
    assert_eq!(
        request.header("Authorization").map(str::to_string),
        Some(format!("Bot {TEST_TOKEN}"))
    );
    assert!(request.header("User-Agent").is_some());
    assert_eq!(request.body, Some(json!({ "content": "hello" })));

    assert_eq!(message.id.as_str(), "m5");
    assert_eq!(message.author, harness.client.current_user().unwrap());
    assert_eq!(message.guild_id.as_ref().map(|g| g.as_str()), Some("g1"));
}

#[tokio::test]
async fn test_send_message_with_embeds_and_files() {
    let harness = ready_harness();
    harness
        .http
        .respond(200, fixtures::message("m5", "c1", ("1", "bot"), ""));

    let options = MessageOptions::new()
        .with_embed(Embed::new())
        .with_embed(Embed::new().with_title("Report"))
        .with_file(FileAttachment::new("log.txt", b"line".to_vec()));
    harness.client.send_message("c1", options).await.unwrap();

    let request = harness.http.last_request().unwrap();
    let body = request.body.unwrap();
    assert_eq!(body["embeds"].as_array().map(Vec::len), Some(1));
    assert_eq!(request.files.len(), 1);
    assert_eq!(request.files[0].name, "log.txt");
}

#[tokio::test]
async fn test_reply_references_original() {
    let harness = ready_harness();
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "ping"),
    ));
    let original = harness.client.message("c1", "m1").unwrap();
    harness
        .http
        .respond(200, fixtures::message("m2", "c1", ("1", "bot"), "pong"));

    harness.client.reply(&original, "pong").await.unwrap();

    let body = harness.http.last_request().unwrap().body.unwrap();
    assert_eq!(body["content"], "pong");
    assert_eq!(body["message_reference"]["message_id"], "m1");
    assert_eq!(body["message_reference"]["channel_id"], "c1");
}

#[tokio::test]
async fn test_failed_response_is_request_error() {
    let harness = ready_harness();
    harness
        .http
        .respond(403, json!({ "message": "Missing Access", "code": 50001 }));

    let err = harness.client.send_message("c1", "hi").await.unwrap_err();

    assert_eq!(err.code(), "REQUEST_ERROR");
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("Missing Access"));
}

#[tokio::test]
async fn test_network_failure_is_not_retried() {
    let harness = ready_harness();
    harness.http.fail("connection reset");

    let err = harness.client.send_message("c1", "hi").await.unwrap_err();

    assert_eq!(err.code(), "REQUEST_ERROR");
    assert_eq!(err.status(), None);
    assert_eq!(harness.http.requests().len(), 1);
}

#[tokio::test]
async fn test_delete_message_drops_it_from_cache() {
    let harness = ready_harness();
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "bye"),
    ));
    let message = harness.client.message("c1", "m1").unwrap();

    harness.client.delete_message(&message).await.unwrap();

    let request = harness.http.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.url, "http://api.test/channels/c1/messages/m1");
    assert!(harness.client.message("c1", "m1").is_none());

    // The gateway echo finds nothing left to delete
    harness.clear_events();
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_DELETE",
        4,
        fixtures::message_delete("m1", "c1"),
    ));
    assert!(harness.non_debug_events().is_empty());
}

#[tokio::test]
async fn test_failed_delete_keeps_message() {
    let harness = ready_harness();
    harness.transport.receive(fixtures::dispatch(
        "MESSAGE_CREATE",
        3,
        fixtures::message("m1", "c1", ("u1", "alice"), "stay"),
    ));
    let message = harness.client.message("c1", "m1").unwrap();
    harness.http.respond(404, json!({ "message": "Unknown Message" }));

    assert!(harness.client.delete_message(&message).await.is_err());
    assert!(harness.client.message("c1", "m1").is_some());
}

#[tokio::test]
async fn test_send_request_with_reason_and_headers() {
    let harness = ready_harness();

    harness
        .client
        .send_request(
            "/guilds/g1/bans/u9",
            Method::PUT,
            RequestOptions::new()
                .with_reason("spam")
                .with_header("X-Trace", "abc"),
        )
        .await
        .unwrap();

    let request = harness.http.last_request().unwrap();
    assert_eq!(request.url, "http://api.test/guilds/g1/bans/u9");
    assert_eq!(request.reason.as_deref(), Some("spam"));
    assert_eq!(request.header("x-trace"), Some("abc"));
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
async fn test_create_and_execute_webhook() {
    let harness = ready_harness();
    harness.http.respond(200, fixtures::webhook("w1", "c1", "secret"));

    let webhook = harness.client.create_webhook("c1", "hook").await.unwrap();

    let create = harness.http.last_request().unwrap();
    assert_eq!(create.method, Method::POST);
    assert_eq!(create.url, "http://api.test/channels/c1/webhooks");
    assert_eq!(create.body, Some(json!({ "name": "hook" })));
    assert_eq!(webhook.token.as_deref(), Some("secret"));

    harness
        .client
        .execute_webhook(&webhook, "from a hook")
        .await
        .unwrap();

    let execute = harness.http.last_request().unwrap();
    assert_eq!(execute.url, "http://api.test/webhooks/w1/secret");
    assert_eq!(execute.body, Some(json!({ "content": "from a hook" })));
}

#[tokio::test]
async fn test_fetch_webhook_by_url() {
    let harness = ready_harness();
    let url = "https://hooks.test/api/webhooks/w2/tok";
    harness.http.respond(200, fixtures::webhook("w2", "c2", "tok"));

    let webhook = harness.client.fetch_webhook(url).await.unwrap();

    let request = harness.http.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, url);
    assert_eq!(webhook.id.as_str(), "w2");
}

#[tokio::test]
async fn test_execute_webhook_without_token_is_state_error() {
    let harness = ready_harness();
    let webhook = chord_client::Webhook::new("w3");

    let err = harness
        .client
        .execute_webhook(&webhook, "nope")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "STATE_ERROR");
    assert!(harness.http.requests().is_empty());
}

#[test]
fn test_avatar_url_uses_configured_cdn() {
    let harness = TestClient::new();
    let mut user = chord_client::User::new("1", "bot");
    assert!(harness.client.avatar_url(&user).is_none());

    user.avatar = Some("abc".to_string());
    let url = harness.client.avatar_url(&user).unwrap();
    assert!(url.starts_with("http://cdn.test/avatars/1/abc"));
}
