//! Non-fatal protocol anomalies
//!
//! Raised while processing inbound frames and reported through `debug` notifications.
//! Processing always continues after one.

use chord_common::ClientError;
use chord_core::Snowflake;

use crate::protocol::OpCode;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolAnomaly {
    #[error("Malformed gateway frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),

    #[error("Malformed {event_type} payload: {source}")]
    MalformedPayload {
        event_type: &'static str,
        source: serde_json::Error,
    },

    #[error("Dispatch frame without an event type")]
    MissingEventType,

    #[error("Malformed Hello payload")]
    MalformedHello,

    #[error("Unexpected {0} frame from server")]
    UnexpectedOpcode(OpCode),

    #[error("{event_type} for unknown channel {channel_id}")]
    UnknownChannel {
        event_type: &'static str,
        channel_id: Snowflake,
    },

    #[error("{event_type} for unknown message {message_id} in channel {channel_id}")]
    UnknownMessage {
        event_type: &'static str,
        channel_id: Snowflake,
        message_id: Snowflake,
    },
}

impl From<ProtocolAnomaly> for ClientError {
    fn from(anomaly: ProtocolAnomaly) -> Self {
        Self::protocol(anomaly)
    }
}
