//! Command definitions
//!
//! Represents requests sent to the server.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Add,
    Delete,
    FlushAll,
    Version,
}

impl CommandType {
    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set => "set",
            CommandType::Add => "add",
            CommandType::Delete => "delete",
            CommandType::FlushAll => "flush_all",
            CommandType::Version => "version",
        }
    }
}

/// A request to the server
///
/// Keys are expected to be validated already (see [`crate::client::to_key_text`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a single key
    Get { key: String },

    /// Store unconditionally
    Set {
        key: String,
        flags: u32,
        exptime: u32,
        value: Vec<u8>,
    },

    /// Store only if the key is absent
    Add {
        key: String,
        flags: u32,
        exptime: u32,
        value: Vec<u8>,
    },

    /// Remove a key
    Delete { key: String },

    /// Invalidate every item immediately
    FlushAll,

    /// Ask for the server version (health check)
    Version,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Add { .. } => CommandType::Add,
            Command::Delete { .. } => CommandType::Delete,
            Command::FlushAll => CommandType::FlushAll,
            Command::Version => CommandType::Version,
        }
    }

    /// The key this command addresses, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::Get { key }
            | Command::Set { key, .. }
            | Command::Add { key, .. }
            | Command::Delete { key } => Some(key),
            Command::FlushAll | Command::Version => None,
        }
    }
}
