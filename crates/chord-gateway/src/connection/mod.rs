//! Connection management
//!
//! Session state, the transport and scheduler seams, and the engine that drives them.

mod engine;
mod scheduler;
mod session;
mod transport;
mod websocket;

pub use engine::{ConnectionEngine, EngineConfig};
pub use scheduler::{ScheduledTask, Scheduler, TaskHandle, TokioScheduler};
pub use session::{ConnectionStatus, Session};
pub use transport::{Transport, TransportEvent, TransportSink};
pub use websocket::WsTransport;
