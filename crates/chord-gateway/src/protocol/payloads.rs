//! Handshake payload definitions

use chord_common::ConnectionProperties;
use serde::{Deserialize, Serialize};

use super::Intents;

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize)]
pub struct IdentifyPayload {
    pub token: String,
    /// Raw intents bitmask
    pub intents: u64,
    pub properties: ConnectionProperties,
}

impl IdentifyPayload {
    pub fn new(token: impl Into<String>, intents: u64, properties: ConnectionProperties) -> Self {
        Self {
            token: token.into(),
            intents,
            properties,
        }
    }

    /// Intents as typed flags, dropping bits this client does not know
    #[must_use]
    pub fn intent_flags(&self) -> Intents {
        Intents::from_bits_truncate(self.intents)
    }
}
