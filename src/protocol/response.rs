//! Response definitions
//!
//! Represents decoded server replies.

use std::fmt;

/// Outcome of a mutating operation
///
/// The numeric codes match the ones libmemcached reports, so callers that
/// compare against those values keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    /// `STORED`, `DELETED` or `OK`
    Success = 0,

    /// `EXISTS`
    Exists = 12,

    /// `NOT_STORED`
    NotStored = 14,

    /// `NOT_FOUND`
    NotFound = 16,

    /// Any status token this client does not recognise
    Unknown = 255,
}

impl StatusCode {
    /// Map a single-line status token to a code
    pub fn from_token(token: &str) -> Self {
        match token {
            "STORED" | "DELETED" | "OK" => StatusCode::Success,
            "NOT_STORED" => StatusCode::NotStored,
            "NOT_FOUND" => StatusCode::NotFound,
            "EXISTS" => StatusCode::Exists,
            _ => StatusCode::Unknown,
        }
    }

    /// Numeric code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Constant-style name (`SUCCESS`, `NOTSTORED`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::Exists => "EXISTS",
            StatusCode::NotStored => "NOTSTORED",
            StatusCode::NotFound => "NOTFOUND",
            StatusCode::Unknown => "UNKNOWN",
        }
    }

    pub fn is_success(&self) -> bool {
        *self == StatusCode::Success
    }
}

/// Stored, deleted or flushed
pub const SUCCESS: StatusCode = StatusCode::Success;

/// `add` found an existing value
pub const NOTSTORED: StatusCode = StatusCode::NotStored;

/// `delete` found nothing
pub const NOTFOUND: StatusCode = StatusCode::NotFound;

pub const MEMCACHED_SUCCESS: StatusCode = SUCCESS;
pub const MEMCACHED_NOTSTORED: StatusCode = NOTSTORED;
pub const MEMCACHED_NOTFOUND: StatusCode = NOTFOUND;

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `VALUE <key> <flags> <bytes>` block followed by `END`
    Value {
        key: String,
        flags: u32,
        data: Vec<u8>,
    },

    /// `END` with no value block
    Miss,

    /// Single-line status reply
    Status(StatusCode),

    /// `VERSION <text>`
    Version(String),

    /// `ERROR`, `CLIENT_ERROR <msg>` or `SERVER_ERROR <msg>` (the full line)
    Error(String),
}

impl Response {
    /// Create a VALUE response
    pub fn value(key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Response::Value {
            key: key.into(),
            flags: 0,
            data: data.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}
