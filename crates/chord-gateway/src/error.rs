//! Gateway error types

use chord_common::ClientError;

/// Errors raised synchronously by gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport is not open")]
    NotOpen,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to encode or decode frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No token available to identify with")]
    MissingToken,

    #[error("Gateway connection is already active")]
    AlreadyConnected,
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for ClientError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotOpen | GatewayError::Transport(_) => Self::transport(err),
            GatewayError::Decode(e) => Self::Decode(e),
            GatewayError::MissingToken => Self::auth(err),
            GatewayError::AlreadyConnected => Self::state(err),
        }
    }
}
