//! Connection
//!
//! Owns the TCP stream to one memcached server.

use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};

use crate::config::Config;
use crate::error::{MemlinkError, Result};
use crate::protocol::{read_response, write_command, Command, Response};

use super::Endpoint;

/// Buffered halves of an open socket
struct Stream {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,
}

/// A blocking connection to a single memcached server
///
/// Requests are strictly serialized: `send_and_receive` takes `&mut self`
/// and does not return until the full response has been read. After an
/// I/O or protocol failure the stream is dropped and every later call
/// fails with [`MemlinkError::Closed`].
pub struct Connection {
    endpoint: Endpoint,

    /// `None` once closed or broken
    stream: Option<Stream>,
}

impl Connection {
    /// Open a connection to `endpoint`
    ///
    /// Tries every resolved address in turn. Fails with
    /// [`MemlinkError::Connection`] when none accepts.
    pub fn connect(endpoint: &Endpoint, config: &Config) -> Result<Self> {
        let connect_err = |source: io::Error| MemlinkError::Connection {
            endpoint: endpoint.to_string(),
            source,
        };

        let addrs = endpoint.resolve().map_err(connect_err)?;

        let mut last_err = None;
        let mut opened = None;
        for addr in addrs {
            let attempt = match config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    opened = Some(stream);
                    break;
                }
                Err(e) => {
                    tracing::debug!("Connect to {} ({}) failed: {}", endpoint, addr, e);
                    last_err = Some(e);
                }
            }
        }

        let stream = match opened {
            Some(stream) => stream,
            None => {
                let err = last_err.unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::NotConnected, "no address to connect to")
                });
                return Err(connect_err(err));
            }
        };

        stream.set_nodelay(config.nodelay).map_err(connect_err)?;
        stream
            .set_read_timeout(config.read_timeout())
            .map_err(connect_err)?;
        stream
            .set_write_timeout(config.write_timeout())
            .map_err(connect_err)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone().map_err(connect_err)?;

        tracing::debug!("Connected to {}", endpoint);

        Ok(Self {
            endpoint: endpoint.clone(),
            stream: Some(Stream {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(stream),
            }),
        })
    }

    /// Send one command and block until its response has been read
    pub fn send_and_receive(&mut self, command: &Command) -> Result<Response> {
        let stream = self.stream.as_mut().ok_or(MemlinkError::Closed)?;

        tracing::trace!("-> {} {:?}", self.endpoint, command.command_type());

        let result = write_command(&mut stream.writer, command)
            .and_then(|()| read_response(command.command_type(), &mut stream.reader));

        match &result {
            Ok(response) => tracing::trace!("<- {} {:?}", self.endpoint, response),
            Err(e) if e.is_fatal() => {
                tracing::warn!("Connection to {} broken: {}", self.endpoint, e);
                self.close();
            }
            Err(_) => {}
        }

        result
    }

    /// Close the stream; later calls are no-ops
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Ignore errors: the peer may already be gone
            let _ = stream.writer.get_ref().shutdown(Shutdown::Both);
            tracing::debug!("Closed connection to {}", self.endpoint);
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
