//! # Error Types
//!
//! Custom error types for Sim Bridge using `thiserror`.
//!
//! The taxonomy mirrors the two failure domains of the telemetry pipeline:
//! [`ProviderError`] is fatal to a publisher run (the simulator session is
//! gone), while [`SinkError`] is recoverable per tick (a bad write must not
//! stop sampling).

use thiserror::Error;

/// Errors raised by the vehicle state provider (the simulator session)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Could not establish the simulator connection
    #[error("failed to connect to simulator at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on an established connection
    #[error("simulator connection lost: {0}")]
    Io(#[from] std::io::Error),

    /// The simulator closed the connection mid-session
    #[error("simulator closed the connection")]
    ConnectionClosed,

    /// The simulator answered with an explicit error
    #[error("simulator rejected '{method}': {reason}")]
    CommandRejected { method: String, reason: String },

    /// The simulator answered with something we could not decode
    #[error("malformed response to '{method}': {reason}")]
    MalformedResponse { method: String, reason: String },
}

/// Errors raised by a snapshot sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Snapshot could not be serialized
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot could not be written durably
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for Sim Bridge
#[derive(Debug, Error)]
pub enum SimBridgeError {
    /// Provider (simulator session) errors
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Snapshot sink errors
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Sim Bridge
pub type Result<T> = std::result::Result<T, SimBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::CommandRejected {
            method: "takeoff".to_string(),
            reason: "vehicle not armed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "simulator rejected 'takeoff': vehicle not armed"
        );
    }

    #[test]
    fn test_sink_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SinkError::from(io);
        assert!(err.to_string().contains("failed to write snapshot"));
    }

    #[test]
    fn test_top_level_error_from_provider() {
        let err: SimBridgeError = ProviderError::ConnectionClosed.into();
        match err {
            SimBridgeError::Provider(ProviderError::ConnectionClosed) => {}
            other => panic!("Expected Provider(ConnectionClosed), got: {:?}", other),
        }
    }
}
