//! Session state
//!
//! What the gateway told us about the current session: last sequence, session id,
//! resume URL, heartbeat interval and liveness.

use chrono::{DateTime, Utc};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// No connection and no pending retry
    #[default]
    Disconnected,
    /// Transport opening or waiting for Hello
    Connecting,
    /// Hello received, heartbeating
    Connected,
    /// Abnormal close seen, retry scheduled
    Reconnecting,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Sequence of the most recently processed Dispatch frame
    pub sequence: Option<u64>,
    pub session_id: Option<String>,
    pub resume_url: Option<String>,
    pub status: ConnectionStatus,
    pub heartbeat_interval_ms: Option<u64>,
    /// Whether the last heartbeat sent has been acknowledged
    pub last_heartbeat_ack: bool,
    /// READY seen on the current connection
    pub ready: bool,
    pub ready_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            sequence: None,
            session_id: None,
            resume_url: None,
            status: ConnectionStatus::Disconnected,
            heartbeat_interval_ms: None,
            last_heartbeat_ack: true,
            ready: false,
            ready_at: None,
        }
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sequence of a Dispatch frame
    pub fn record_sequence(&mut self, sequence: Option<u64>) {
        if let Some(seq) = sequence {
            self.sequence = Some(seq);
        }
    }

    /// Mark the session ready
    pub fn mark_ready(&mut self, session_id: Option<String>, resume_url: Option<String>) {
        self.ready = true;
        self.ready_at = Some(Utc::now());
        self.session_id = session_id;
        self.resume_url = resume_url;
    }

    /// Heartbeat sent; an ACK is now pending
    pub fn await_heartbeat_ack(&mut self) {
        self.last_heartbeat_ack = false;
    }

    pub fn ack_heartbeat(&mut self) {
        self.last_heartbeat_ack = true;
    }

    /// Ready on a live connection
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready && self.status == ConnectionStatus::Connected
    }
}
