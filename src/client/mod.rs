//! Client Module
//!
//! Public operation surface. Every call normalizes its key, runs exactly one
//! request/response round trip on the owned [`Connection`], and translates
//! the reply.
//!
//! ## Outcomes
//! - `get`/`fetch`: `Some(text)` on hit, `None` on miss
//! - `set`/`store`/`add`/`delete`/`flush`: a [`StatusCode`]
//! - transport, protocol and server failures: [`MemlinkError`]
//!
//! No retries are performed.

mod key;

pub use key::{to_key_text, to_value_text, Symbol, ToKeyText, MAX_KEY_LENGTH};

use std::fmt::Display;

use crate::config::Config;
use crate::error::{MemlinkError, Result};
use crate::network::{Connection, Endpoint};
use crate::protocol::{Command, Response, StatusCode};

/// A blocking memcached client bound to one server
///
/// ```no_run
/// use memlink::{Client, Symbol, NOTSTORED};
///
/// let mut client = Client::new("127.0.0.1:11211")?;
/// client.set("foo", 100)?;
/// assert_eq!(client.get(Symbol::new("foo"))?.as_deref(), Some("100"));
/// assert_eq!(client.add("foo", 101)?, NOTSTORED);
/// client.close();
/// # Ok::<(), memlink::MemlinkError>(())
/// ```
pub struct Client {
    connection: Connection,
    config: Config,
}

impl Client {
    /// Connect to a `"host:port"` endpoint
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_config(Config::builder().endpoint(endpoint).build())
    }

    /// Connect to a server given as separate host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        let endpoint = Endpoint::new(host, port)?;
        let config = Config::builder().endpoint(endpoint.to_string()).build();
        Self::open(endpoint, config)
    }

    /// Connect using a full configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let endpoint = Endpoint::parse(&config.endpoint)?;
        Self::open(endpoint, config)
    }

    fn open(endpoint: Endpoint, config: Config) -> Result<Self> {
        let connection = Connection::connect(&endpoint, &config)?;
        Ok(Self { connection, config })
    }

    // -------------------------------------------------------------------------
    // Storage
    // -------------------------------------------------------------------------

    /// Store a value, overwriting any existing one
    pub fn set<K, V>(&mut self, key: K, value: V) -> Result<StatusCode>
    where
        K: ToKeyText,
        V: Display,
    {
        let exptime = self.config.default_exptime;
        self.set_with_expiry(key, value, exptime)
    }

    /// Store a value that expires after `exptime` seconds (0 = never)
    pub fn set_with_expiry<K, V>(&mut self, key: K, value: V, exptime: u32) -> Result<StatusCode>
    where
        K: ToKeyText,
        V: Display,
    {
        let command = Command::Set {
            key: to_key_text(&key)?,
            flags: 0,
            exptime,
            value: to_value_text(&value).into_bytes(),
        };
        self.status(&command)
    }

    /// Store a value only if the key is absent
    ///
    /// Returns `NotStored` and leaves the existing value alone otherwise.
    pub fn add<K, V>(&mut self, key: K, value: V) -> Result<StatusCode>
    where
        K: ToKeyText,
        V: Display,
    {
        let exptime = self.config.default_exptime;
        self.add_with_expiry(key, value, exptime)
    }

    pub fn add_with_expiry<K, V>(&mut self, key: K, value: V, exptime: u32) -> Result<StatusCode>
    where
        K: ToKeyText,
        V: Display,
    {
        let command = Command::Add {
            key: to_key_text(&key)?,
            flags: 0,
            exptime,
            value: to_value_text(&value).into_bytes(),
        };
        self.status(&command)
    }

    /// Bracket-style alias for [`Client::set`]
    pub fn store<K, V>(&mut self, key: K, value: V) -> Result<StatusCode>
    where
        K: ToKeyText,
        V: Display,
    {
        self.set(key, value)
    }

    // -------------------------------------------------------------------------
    // Retrieval
    // -------------------------------------------------------------------------

    /// Fetch a value; `None` when absent or expired
    pub fn get<K: ToKeyText>(&mut self, key: K) -> Result<Option<String>> {
        let key = to_key_text(&key)?;
        let command = Command::Get { key };

        match self.connection.send_and_receive(&command)? {
            Response::Miss => Ok(None),
            Response::Value { key: got, data, .. } => {
                if Some(got.as_str()) != command.key() {
                    return Err(self.desync(format!("asked for {:?}, got {:?}", command.key(), got)));
                }
                match String::from_utf8(data) {
                    Ok(text) => Ok(Some(text)),
                    Err(_) => Err(self.desync(format!("value for {:?} is not valid UTF-8", got))),
                }
            }
            Response::Error(line) => Err(MemlinkError::Server(line)),
            other => Err(self.desync(format!("unexpected reply to get: {:?}", other))),
        }
    }

    /// Bracket-style alias for [`Client::get`]
    pub fn fetch<K: ToKeyText>(&mut self, key: K) -> Result<Option<String>> {
        self.get(key)
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Remove a key; `NotFound` if it was not there
    pub fn delete<K: ToKeyText>(&mut self, key: K) -> Result<StatusCode> {
        let command = Command::Delete {
            key: to_key_text(&key)?,
        };
        self.status(&command)
    }

    /// Invalidate every item on the server immediately
    pub fn flush(&mut self) -> Result<StatusCode> {
        self.status(&Command::FlushAll)
    }

    // -------------------------------------------------------------------------
    // Misc
    // -------------------------------------------------------------------------

    /// Server version string
    pub fn version(&mut self) -> Result<String> {
        match self.connection.send_and_receive(&Command::Version)? {
            Response::Version(version) => Ok(version),
            Response::Error(line) => Err(MemlinkError::Server(line)),
            other => Err(self.desync(format!("unexpected reply to version: {:?}", other))),
        }
    }

    /// Number of servers this client talks to (always one)
    pub fn count_servers(&self) -> usize {
        1
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.connection.endpoint()
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_open()
    }

    /// Release the connection; safe to call more than once
    pub fn close(&mut self) {
        self.connection.close();
    }

    /// Round trip for commands answered by a single status line
    fn status(&mut self, command: &Command) -> Result<StatusCode> {
        match self.connection.send_and_receive(command)? {
            Response::Status(code) => Ok(code),
            Response::Error(line) => Err(MemlinkError::Server(line)),
            other => Err(self.desync(format!(
                "unexpected reply to {}: {:?}",
                command.command_type().name(),
                other
            ))),
        }
    }

    /// The stream can no longer be trusted; drop it
    fn desync(&mut self, message: String) -> MemlinkError {
        tracing::warn!("Protocol desync on {}: {}", self.connection.endpoint(), message);
        self.connection.close();
        MemlinkError::Protocol(message)
    }
}
