//! Gateway events
//!
//! Dispatch event names, typed payloads, the decode step, entity mappers, and the
//! notifications raised to client listeners.

mod anomaly;
mod client_event;
mod dispatch_event;
mod event_types;
pub mod mappers;
pub mod payloads;

pub use anomaly::ProtocolAnomaly;
pub use client_event::{ClientEvent, EventKind, UnknownEventKind};
pub use dispatch_event::DispatchEvent;
pub use event_types::GatewayEventType;
