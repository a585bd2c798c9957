//! # chord-gateway
//!
//! Gateway client: wire protocol, connection engine, and the event dispatcher that
//! rebuilds entity state from dispatch events.

pub mod connection;
pub mod error;
pub mod events;
pub mod handlers;
pub mod protocol;

pub use connection::{
    ConnectionEngine, ConnectionStatus, EngineConfig, Scheduler, ScheduledTask, Session,
    TaskHandle, TokioScheduler, Transport, TransportEvent, TransportSink, WsTransport,
};
pub use error::{GatewayError, GatewayResult};
pub use events::{ClientEvent, DispatchEvent, EventKind, GatewayEventType, ProtocolAnomaly};
pub use handlers::{
    DispatchOutcome, EntityStore, EventDispatcher, GatewayState, Listener, Notifier, SharedState,
};
pub use protocol::{CloseCode, GatewayMessage, Intents, OpCode};
