//! # memlink
//!
//! A minimal, blocking memcached client for a single server:
//! - Text protocol subset (`get`, `set`, `add`, `delete`, `flush_all`, `version`)
//! - One TCP connection per client, one request in flight
//! - String and symbol keys normalized to the same key text
//! - Values stored and returned as text
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │         (key/value normalization, status mapping)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command / Response
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Connection                             │
//! │             (owns the TcpStream, serialized I/O)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Wire Codec                              │
//! │            (text protocol encode / decode)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MemlinkError, Result};
pub use config::Config;
pub use client::{Client, Symbol, ToKeyText};
pub use network::Endpoint;
pub use protocol::{
    StatusCode, MEMCACHED_NOTFOUND, MEMCACHED_NOTSTORED, MEMCACHED_SUCCESS, NOTFOUND, NOTSTORED,
    SUCCESS,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
