//! Client error types
//!
//! Unified error handling for the public client surface.

use std::fmt;

use crate::config::ConfigError;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No token could be resolved for login
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Operation is invalid for the current connection state
    #[error("Invalid state: {0}")]
    State(String),

    /// Send attempted on a closed or absent transport, or the socket failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// REST call failed. `status` is `None` when no response was received.
    #[error("Request failed: {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// Malformed or unexpected gateway payload. Never fatal.
    #[error("Protocol anomaly: {0}")]
    Protocol(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl ClientError {
    /// Get a stable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "AUTH_ERROR",
            Self::State(_) => "STATE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Request { .. } => "REQUEST_ERROR",
            Self::Protocol(_) => "PROTOCOL_ANOMALY",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a caller could reasonably retry the failed operation.
    ///
    /// Informative only; the client never retries REST calls itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Request { status, .. } => {
                status.is_none_or(|s| s == 429 || (500..600).contains(&s))
            }
            _ => false,
        }
    }

    /// HTTP status of a failed request, if one was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }

    #[must_use]
    pub fn auth(msg: impl fmt::Display) -> Self {
        Self::Auth(msg.to_string())
    }

    #[must_use]
    pub fn state(msg: impl fmt::Display) -> Self {
        Self::State(msg.to_string())
    }

    #[must_use]
    pub fn transport(msg: impl fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    #[must_use]
    pub fn protocol(msg: impl fmt::Display) -> Self {
        Self::Protocol(msg.to_string())
    }

    #[must_use]
    pub fn request(status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::Request {
            status,
            message: message.to_string(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
