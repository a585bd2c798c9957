//! Transport seam
//!
//! The connection engine drives a message-oriented socket through this trait and
//! receives its events through a [`TransportSink`] callback.

use std::sync::Arc;

use crate::error::GatewayResult;

/// Event raised by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open,
    Message(String),
    Error(String),
    /// Closed by the remote end or by a failure. Not raised for [`Transport::close`].
    Close { code: u16, reason: String },
}

/// Callback receiving transport events, in delivery order
pub type TransportSink = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// Message-oriented socket
pub trait Transport: Send + Sync {
    /// Open a connection to `url`, replacing any existing one
    ///
    /// Events for the new connection are delivered to `sink`.
    fn open(&self, url: &str, sink: TransportSink) -> GatewayResult<()>;

    /// Queue a text frame
    fn send(&self, text: String) -> GatewayResult<()>;

    /// Close the connection with `code`
    fn close(&self, code: u16);

    fn is_open(&self) -> bool;
}
