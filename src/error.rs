//! Error types for memlink
//!
//! Provides a unified error type for all client operations.
//!
//! Cache misses, `NOT_STORED` and `NOT_FOUND` are not errors; they come back
//! as `None` or as a [`StatusCode`](crate::StatusCode).

use thiserror::Error;

/// Result type alias using MemlinkError
pub type Result<T> = std::result::Result<T, MemlinkError>;

/// Unified error type for memlink operations
#[derive(Debug, Error)]
pub enum MemlinkError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemlinkError {
    /// Whether a round trip failing with this error leaves the stream unusable
    pub fn is_fatal(&self) -> bool {
        matches!(self, MemlinkError::Io(_) | MemlinkError::Protocol(_))
    }
}
