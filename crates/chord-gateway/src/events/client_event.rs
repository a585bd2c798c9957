//! Notifications raised to client listeners

use std::fmt;
use std::str::FromStr;

use chord_core::{Message, User};

/// Notification names listeners can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Message,
    MessageDelete,
    Debug,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [Self::Ready, Self::Message, Self::MessageDelete, Self::Debug];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Message => "message",
            Self::MessageDelete => "messageDelete",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised notification name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(Self::Ready),
            "message" => Ok(Self::Message),
            "messageDelete" => Ok(Self::MessageDelete),
            "debug" => Ok(Self::Debug),
            other => Err(UnknownEventKind(other.to_string())),
        }
    }
}

/// Notification payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Session is ready; carries the current user
    Ready(User),
    /// A message was created in a cached channel
    Message(Box<Message>),
    /// A cached message was deleted; carries its last known state
    MessageDelete(Box<Message>),
    /// Diagnostic text: anomalies, reconnect progress, transport errors
    Debug(String),
}

impl ClientEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::Message(_) => EventKind::Message,
            Self::MessageDelete(_) => EventKind::MessageDelete,
            Self::Debug(_) => EventKind::Debug,
        }
    }
}
