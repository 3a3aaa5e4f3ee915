//! Endpoint
//!
//! Address of a single memcached server.

use std::fmt;
use std::io;
use std::net::{Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::error::{MemlinkError, Result};

/// Host and port of one memcached server
///
/// Immutable once built. Accepts `"host:port"` or `"[v6addr]:port"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Build an endpoint from separate host and port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host.as_str())
            .to_string();

        if bare.is_empty() {
            return Err(MemlinkError::InvalidEndpoint("empty host".to_string()));
        }
        if bare.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(MemlinkError::InvalidEndpoint(format!(
                "host contains whitespace or control characters: {:?}",
                bare
            )));
        }
        if bare.contains(':') && bare.parse::<Ipv6Addr>().is_err() {
            return Err(MemlinkError::InvalidEndpoint(format!(
                "host {:?} contains ':' but is not an IPv6 address",
                bare
            )));
        }
        if port == 0 {
            return Err(MemlinkError::InvalidEndpoint(format!(
                "port 0 is not connectable ({})",
                bare
            )));
        }

        Ok(Self { host: bare, port })
    }

    /// Parse a `"host:port"` string
    pub fn parse(addr: &str) -> Result<Self> {
        let addr = addr.trim();

        let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
            MemlinkError::InvalidEndpoint(format!("expected host:port, got {:?}", addr))
        })?;

        // Unbracketed IPv6 is ambiguous
        if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
            return Err(MemlinkError::InvalidEndpoint(format!(
                "IPv6 hosts must be bracketed: {:?}",
                addr
            )));
        }

        let port = port.parse::<u16>().map_err(|_| {
            MemlinkError::InvalidEndpoint(format!("invalid port {:?} in {:?}", port, addr))
        })?;

        Self::new(host, port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to socket addresses (DNS lookup for hostnames)
    pub fn resolve(&self) -> io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port).to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{} resolved to no addresses", self),
            ));
        }
        Ok(addrs)
    }
}

impl FromStr for Endpoint {
    type Err = MemlinkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
