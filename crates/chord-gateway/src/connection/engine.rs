//! Connection engine
//!
//! Owns the transport and runs the gateway lifecycle: identify on open, heartbeat
//! after Hello, reconnect on any abnormal close until a session is ready again.
//!
//! Transport and scheduler callbacks hold a `Weak` reference to the engine, so
//! dropping the last `ConnectionEngine` handle tears everything down.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chord_common::{ClientConfig, ConnectionProperties};
use parking_lot::Mutex;

use super::scheduler::{ScheduledTask, Scheduler, TaskHandle};
use super::session::ConnectionStatus;
use super::transport::{Transport, TransportEvent, TransportSink};
use crate::error::{GatewayError, GatewayResult};
use crate::events::ProtocolAnomaly;
use crate::handlers::{DispatchOutcome, EventDispatcher, Notifier, SharedState};
use crate::protocol::{CloseCode, GatewayMessage, IdentifyPayload, OpCode};

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub gateway_url: String,
    pub intents: u64,
    pub properties: ConnectionProperties,
    /// Fixed delay between reconnection attempts
    pub reconnect_delay: Duration,
    /// Force a reconnect when a heartbeat tick finds the previous one unacknowledged
    pub detect_zombie: bool,
}

impl From<&ClientConfig> for EngineConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            gateway_url: config.gateway_url.clone(),
            intents: config.intents,
            properties: config.properties.clone(),
            reconnect_delay: config.reconnect_delay(),
            detect_zombie: config.detect_zombie_connections,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Gateway connection engine
#[derive(Clone)]
pub struct ConnectionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    state: SharedState,
    dispatcher: EventDispatcher,
    notifier: Arc<Notifier>,
    token: Mutex<Option<String>>,
    heartbeat_task: Mutex<Option<TaskHandle>>,
    reconnect_task: Mutex<Option<TaskHandle>>,
}

impl ConnectionEngine {
    pub fn new(
        config: EngineConfig,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        state: SharedState,
        notifier: Arc<Notifier>,
    ) -> Self {
        let dispatcher = EventDispatcher::new(state.clone(), notifier.clone());
        Self {
            inner: Arc::new(EngineInner {
                config,
                transport,
                scheduler,
                state,
                dispatcher,
                notifier,
                token: Mutex::new(None),
                heartbeat_task: Mutex::new(None),
                reconnect_task: Mutex::new(None),
            }),
        }
    }

    fn from_weak(weak: &Weak<EngineInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn state(&self) -> &SharedState {
        &self.inner.state
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.lock().session.status
    }

    /// A reconnection retry is pending
    pub fn is_reconnecting(&self) -> bool {
        self.inner.reconnect_task.lock().is_some()
    }

    /// Open the gateway connection and identify with `token` once it is open
    pub fn connect(&self, token: &str) -> GatewayResult<()> {
        if token.trim().is_empty() {
            return Err(GatewayError::MissingToken);
        }

        {
            let mut state = self.inner.state.lock();
            if state.session.status != ConnectionStatus::Disconnected {
                return Err(GatewayError::AlreadyConnected);
            }
            state.session.status = ConnectionStatus::Connecting;
        }

        *self.inner.token.lock() = Some(token.to_string());

        if let Err(e) = self.open() {
            self.inner.state.lock().session.status = ConnectionStatus::Disconnected;
            return Err(e);
        }
        Ok(())
    }

    /// Serialize and send a frame
    pub fn send(&self, message: &GatewayMessage) -> GatewayResult<()> {
        if !self.inner.transport.is_open() {
            return Err(GatewayError::NotOpen);
        }
        tracing::trace!(op = %message.op, "Sending gateway frame");
        self.inner.transport.send(message.to_json()?)
    }

    /// Close with normal closure. Cancels the heartbeat and any pending retry.
    pub fn close(&self) {
        self.cancel_heartbeat();
        self.cancel_reconnect();
        {
            let mut state = self.inner.state.lock();
            state.session.status = ConnectionStatus::Disconnected;
            state.session.ready = false;
        }
        self.inner.transport.close(CloseCode::NORMAL_CLOSURE);
        tracing::info!("Gateway connection closed");
    }

    fn open(&self) -> GatewayResult<()> {
        self.inner.state.lock().session.status = ConnectionStatus::Connecting;

        let weak = Arc::downgrade(&self.inner);
        let sink: TransportSink = Arc::new(move |event| {
            if let Some(engine) = Self::from_weak(&weak) {
                engine.handle_event(event);
            }
        });

        tracing::info!(url = %self.inner.config.gateway_url, "Opening gateway connection");
        self.inner.transport.open(&self.inner.config.gateway_url, sink)
    }

    fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Open => self.identify(),
            TransportEvent::Message(text) => self.handle_frame(&text),
            TransportEvent::Error(error) => {
                tracing::warn!(error = %error, "Transport error");
                self.inner.notifier.debug(format!("Transport error: {error}"));
            }
            TransportEvent::Close { code, reason } => {
                if self.status() == ConnectionStatus::Disconnected {
                    return;
                }
                tracing::info!(close_code = code, reason = %reason, "Gateway connection lost");
                self.handle_close(code);
            }
        }
    }

    fn identify(&self) {
        let token = self.inner.token.lock().clone();
        let Some(token) = token else {
            self.inner.notifier.debug("Transport opened without a token");
            return;
        };

        let config = &self.inner.config;
        let payload = IdentifyPayload::new(token, config.intents, config.properties.clone());
        let result = GatewayMessage::identify(&payload)
            .map_err(GatewayError::from)
            .and_then(|frame| self.send(&frame));

        match result {
            Ok(()) => tracing::debug!(intents = config.intents, "Identify sent"),
            Err(e) => self.inner.notifier.debug(format!("Failed to send identify: {e}")),
        }
    }

    fn handle_frame(&self, text: &str) {
        let message = match GatewayMessage::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                self.inner
                    .notifier
                    .debug(ProtocolAnomaly::MalformedFrame(e).to_string());
                return;
            }
        };

        match message.op {
            OpCode::Dispatch => {
                let outcome =
                    self.inner
                        .dispatcher
                        .dispatch(message.t.as_deref(), message.s, message.d);
                if outcome == DispatchOutcome::Ready && self.cancel_reconnect() {
                    self.inner.notifier.debug("Reconnected");
                }
            }
            OpCode::Hello => match message.as_hello() {
                Some(hello) if hello.heartbeat_interval > 0 => {
                    self.start_heartbeat(hello.heartbeat_interval);
                }
                _ => self
                    .inner
                    .notifier
                    .debug(ProtocolAnomaly::MalformedHello.to_string()),
            },
            OpCode::Heartbeat => self.send_heartbeat(),
            OpCode::HeartbeatAck => {
                tracing::trace!("Heartbeat acknowledged");
                self.inner.state.lock().session.ack_heartbeat();
            }
            OpCode::Reconnect | OpCode::InvalidSession => {
                self.inner
                    .notifier
                    .debug(format!("Gateway requested a new session ({})", message.op));
                self.force_reconnect();
            }
            other => self
                .inner
                .notifier
                .debug(ProtocolAnomaly::UnexpectedOpcode(other).to_string()),
        }
    }

    fn start_heartbeat(&self, interval_ms: u64) {
        {
            let mut state = self.inner.state.lock();
            state.session.heartbeat_interval_ms = Some(interval_ms);
            state.session.status = ConnectionStatus::Connected;
            state.session.ack_heartbeat();
        }

        let weak = Arc::downgrade(&self.inner);
        let task: ScheduledTask = Arc::new(move || {
            if let Some(engine) = Self::from_weak(&weak) {
                engine.heartbeat_tick();
            }
        });
        let handle = self
            .inner
            .scheduler
            .schedule(Duration::from_millis(interval_ms), task);

        if let Some(previous) = self.inner.heartbeat_task.lock().replace(handle) {
            previous.cancel();
        }

        tracing::debug!(heartbeat_interval_ms = interval_ms, "Heartbeat started");
    }

    fn heartbeat_tick(&self) {
        let (status, acked) = {
            let state = self.inner.state.lock();
            (state.session.status, state.session.last_heartbeat_ack)
        };

        if status != ConnectionStatus::Connected {
            return;
        }

        if self.inner.config.detect_zombie && !acked {
            tracing::warn!("Heartbeat not acknowledged, connection zombied");
            self.inner
                .notifier
                .debug("Heartbeat not acknowledged; reconnecting");
            self.force_reconnect();
            return;
        }

        self.send_heartbeat();
    }

    fn send_heartbeat(&self) {
        let sequence = self.inner.state.lock().session.sequence;

        match self.send(&GatewayMessage::heartbeat(sequence)) {
            Ok(()) => {
                tracing::trace!(sequence = ?sequence, "Heartbeat sent");
                self.inner.state.lock().session.await_heartbeat_ack();
            }
            Err(e) => self
                .inner
                .notifier
                .debug(format!("Failed to send heartbeat: {e}")),
        }
    }

    fn force_reconnect(&self) {
        self.inner.transport.close(CloseCode::FORCED_RECONNECT);
        self.handle_close(CloseCode::FORCED_RECONNECT);
    }

    fn handle_close(&self, code: u16) {
        self.cancel_heartbeat();

        if !CloseCode::reconnects(code) {
            self.cancel_reconnect();
            {
                let mut state = self.inner.state.lock();
                state.session.status = ConnectionStatus::Disconnected;
                state.session.ready = false;
            }
            self.inner
                .notifier
                .debug(format!("Gateway closed: {}", CloseCode::describe(code)));
            return;
        }

        {
            let mut state = self.inner.state.lock();
            state.session.status = ConnectionStatus::Reconnecting;
            state.session.ready = false;
            // The next connection identifies afresh, so the old counter no longer applies
            state.session.sequence = None;
            state.session.ack_heartbeat();
        }

        let delay = self.inner.config.reconnect_delay;
        {
            let mut pending = self.inner.reconnect_task.lock();
            if pending.is_some() {
                return;
            }

            let weak = Arc::downgrade(&self.inner);
            let task: ScheduledTask = Arc::new(move || {
                if let Some(engine) = Self::from_weak(&weak) {
                    engine.retry();
                }
            });
            *pending = Some(self.inner.scheduler.schedule(delay, task));
        }

        tracing::warn!(
            close_code = code,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Scheduling reconnect"
        );
        self.inner.notifier.debug(format!(
            "Connection lost ({}); reconnecting every {}ms",
            CloseCode::describe(code),
            delay.as_millis()
        ));
    }

    fn retry(&self) {
        // Connecting: an attempt is still in flight and reports its own failure as a close
        if self.status() != ConnectionStatus::Reconnecting {
            return;
        }

        self.inner.notifier.debug("Attempting to reconnect");
        if let Err(e) = self.open() {
            self.inner.state.lock().session.status = ConnectionStatus::Reconnecting;
            self.inner
                .notifier
                .debug(format!("Reconnect attempt failed: {e}"));
        }
    }

    fn cancel_heartbeat(&self) {
        if let Some(task) = self.inner.heartbeat_task.lock().take() {
            task.cancel();
        }
    }

    /// Returns whether a retry was pending
    fn cancel_reconnect(&self) -> bool {
        match self.inner.reconnect_task.lock().take() {
            Some(task) => {
                task.cancel();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ConnectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionEngine")
            .field("config", &self.inner.config)
            .field("status", &self.status())
            .field("reconnecting", &self.is_reconnecting())
            .finish_non_exhaustive()
    }
}
