//! Test helpers for integration tests
//!
//! Provides a scripted transport, a scheduler fired by hand, a recording HTTP
//! client, and a harness wiring them into a [`Client`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chord_client::{Client, ClientBuilder, HttpClient, RestRequest, RestResponse};
use chord_common::{ClientConfig, ClientError, ClientResult};
use chord_gateway::{
    ClientEvent, GatewayError, GatewayResult, ScheduledTask, Scheduler, TaskHandle, Transport,
    TransportEvent, TransportSink,
};
use parking_lot::Mutex;
use serde_json::Value;

// ============================================================================
// Transport
// ============================================================================

/// Transport driven by the test
///
/// Frames sent by the engine are recorded; events are injected with [`deliver`](Self::deliver).
#[derive(Default)]
pub struct MockTransport {
    sink: Mutex<Option<TransportSink>>,
    open: Mutex<bool>,
    sent: Mutex<Vec<String>>,
    closes: Mutex<Vec<u16>>,
    opens: Mutex<usize>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hand an event to the engine as the socket would
    pub fn deliver(&self, event: TransportEvent) {
        match &event {
            TransportEvent::Open => *self.open.lock() = true,
            TransportEvent::Close { .. } => *self.open.lock() = false,
            _ => {}
        }
        let sink = self.sink.lock().clone();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    pub fn open_socket(&self) {
        self.deliver(TransportEvent::Open);
    }

    pub fn receive(&self, frame: impl Into<String>) {
        self.deliver(TransportEvent::Message(frame.into()));
    }

    pub fn remote_close(&self, code: u16) {
        self.deliver(TransportEvent::Close {
            code,
            reason: String::new(),
        });
    }

    /// Frames sent so far, decoded
    pub fn sent(&self) -> Vec<Value> {
        self.sent
            .lock()
            .iter()
            .filter_map(|text| serde_json::from_str(text).ok())
            .collect()
    }

    /// Sent frames with the given opcode
    pub fn sent_with_op(&self, op: u64) -> Vec<Value> {
        self.sent()
            .into_iter()
            .filter(|frame| frame["op"].as_u64() == Some(op))
            .collect()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }

    /// Codes passed to `close` by the engine
    pub fn closes(&self) -> Vec<u16> {
        self.closes.lock().clone()
    }

    /// Number of times the engine opened a connection
    pub fn opens(&self) -> usize {
        *self.opens.lock()
    }
}

impl Transport for MockTransport {
    fn open(&self, _url: &str, sink: TransportSink) -> GatewayResult<()> {
        *self.sink.lock() = Some(sink);
        *self.opens.lock() += 1;
        Ok(())
    }

    fn send(&self, text: String) -> GatewayResult<()> {
        if !*self.open.lock() {
            return Err(GatewayError::NotOpen);
        }
        self.sent.lock().push(text);
        Ok(())
    }

    fn close(&self, code: u16) {
        *self.open.lock() = false;
        self.closes.lock().push(code);
    }

    fn is_open(&self) -> bool {
        *self.open.lock()
    }
}

// ============================================================================
// Scheduler
// ============================================================================

struct Scheduled {
    interval: Duration,
    task: ScheduledTask,
    handle: TaskHandle,
}

/// Scheduler whose tasks only run when the test fires them
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<Scheduled>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run one tick of every live task registered with `interval`
    ///
    /// Returns how many tasks ran.
    pub fn fire(&self, interval: Duration) -> usize {
        let due: Vec<ScheduledTask> = self
            .tasks
            .lock()
            .iter()
            .filter(|s| s.interval == interval && !s.handle.is_cancelled())
            .map(|s| s.task.clone())
            .collect();

        for task in &due {
            task();
        }
        due.len()
    }

    /// Intervals of every task ever registered, in order
    pub fn intervals(&self) -> Vec<Duration> {
        self.tasks.lock().iter().map(|s| s.interval).collect()
    }

    /// Live tasks registered with `interval`
    pub fn active(&self, interval: Duration) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|s| s.interval == interval && !s.handle.is_cancelled())
            .count()
    }

    pub fn active_total(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, task: ScheduledTask) -> TaskHandle {
        let handle = TaskHandle::new();
        self.tasks.lock().push(Scheduled {
            interval,
            task,
            handle: handle.clone(),
        });
        handle
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client that records requests and replays queued responses
///
/// With an empty queue every request gets `204 No Content`.
#[derive(Default)]
pub struct RecordingHttp {
    requests: Mutex<Vec<RestRequest>>,
    responses: Mutex<VecDeque<Result<RestResponse, String>>>,
}

impl RecordingHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .push_back(Ok(RestResponse::new(status, Some(body))));
    }

    /// Next request fails without a response
    pub fn fail(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Err(message.into()));
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<RestRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn execute(&self, request: RestRequest) -> ClientResult<RestResponse> {
        self.requests.lock().push(request);
        match self.responses.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ClientError::request(None, message)),
            None => Ok(RestResponse::new(204, None)),
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

pub const TEST_TOKEN: &str = "test-token";
pub const RECONNECT_DELAY: Duration = Duration::from_millis(5000);

/// Configuration pointing at test URLs
pub fn test_config() -> ClientConfig {
    ClientConfig {
        gateway_url: "ws://gateway.test".to_string(),
        api_url: "http://api.test".to_string(),
        cdn_url: "http://cdn.test".to_string(),
        reconnect_delay_ms: 5000,
        ..ClientConfig::default()
    }
}

/// Client wired to the mock collaborators, with every notification recorded
pub struct TestClient {
    pub client: Client,
    pub transport: Arc<MockTransport>,
    pub scheduler: Arc<ManualScheduler>,
    pub http: Arc<RecordingHttp>,
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = MockTransport::new();
        let scheduler = ManualScheduler::new();
        let http = RecordingHttp::new();

        let client = ClientBuilder::new(config)
            .transport(transport.clone())
            .scheduler(scheduler.clone())
            .http(http.clone())
            .build();

        let events = Arc::new(Mutex::new(Vec::new()));
        for kind in chord_gateway::EventKind::ALL {
            let events = events.clone();
            client.on(kind, move |event| events.lock().push(event.clone()));
        }

        Self {
            client,
            transport,
            scheduler,
            http,
            events,
        }
    }

    /// Log in, open the socket and receive Hello
    pub fn connect(&self, heartbeat_interval: u64) {
        self.client
            .login(Some(TEST_TOKEN))
            .expect("login should succeed");
        self.transport.open_socket();
        self.transport
            .receive(crate::fixtures::hello(heartbeat_interval));
    }

    /// Connect and complete a READY with the given guild ids
    pub fn connect_ready(&self, guild_ids: &[&str]) {
        self.connect(41_250);
        self.transport.receive(crate::fixtures::dispatch(
            "READY",
            1,
            crate::fixtures::ready("1", "bot", guild_ids),
        ));
    }

    /// Every notification received so far
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().clone()
    }

    pub fn debug_messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ClientEvent::Debug(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Notifications other than `debug`
    pub fn non_debug_events(&self) -> Vec<ClientEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| !matches!(event, ClientEvent::Debug(_)))
            .cloned()
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
