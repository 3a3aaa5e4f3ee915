//! Protocol codec
//!
//! Encoding and decoding functions for the memcached text protocol.
//!
//! ## Wire Format
//!
//! ### Requests
//! ```text
//! get <key>\r\n
//! set <key> <flags> <exptime> <bytes>\r\n<data>\r\n
//! add <key> <flags> <exptime> <bytes>\r\n<data>\r\n
//! delete <key>\r\n
//! flush_all\r\n
//! version\r\n
//! ```
//!
//! ### Responses
//! ```text
//! VALUE <key> <flags> <bytes>\r\n<data>\r\nEND\r\n    (hit)
//! END\r\n                                             (miss)
//! STORED | NOT_STORED | DELETED | NOT_FOUND | OK      (status line)
//! VERSION <text>\r\n
//! ERROR | CLIENT_ERROR <msg> | SERVER_ERROR <msg>
//! ```

use std::io::{self, BufRead, Cursor, Read, Write};

use bytes::{Bytes, BytesMut};

use super::{Command, CommandType, Response, StatusCode};
use crate::error::{MemlinkError, Result};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Longest response line accepted (excluding CRLF)
pub const MAX_LINE_LENGTH: usize = 1024;

/// Largest value payload accepted (memcached's default item size limit)
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Bytes {
    let name = command.command_type().name();

    let mut buf = match command {
        Command::Get { key } | Command::Delete { key } => {
            let mut buf = BytesMut::with_capacity(name.len() + key.len() + 3);
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b" ");
            buf.extend_from_slice(key.as_bytes());
            buf
        }
        Command::Set {
            key,
            flags,
            exptime,
            value,
        }
        | Command::Add {
            key,
            flags,
            exptime,
            value,
        } => {
            let header = format!("{} {} {} {} {}", name, key, flags, exptime, value.len());
            let mut buf = BytesMut::with_capacity(header.len() + value.len() + 4);
            buf.extend_from_slice(header.as_bytes());
            buf.extend_from_slice(CRLF);
            buf.extend_from_slice(value);
            buf
        }
        Command::FlushAll | Command::Version => {
            let mut buf = BytesMut::with_capacity(name.len() + 2);
            buf.extend_from_slice(name.as_bytes());
            buf
        }
    };

    buf.extend_from_slice(CRLF);
    buf.freeze()
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a complete response held in memory
///
/// `kind` is the command the response answers. The slice must contain
/// exactly one response.
pub fn decode_response(kind: CommandType, bytes: &[u8]) -> Result<Response> {
    let mut cursor = Cursor::new(bytes);

    let response = read_response(kind, &mut cursor).map_err(|e| match e {
        MemlinkError::Io(io) => MemlinkError::Protocol(format!("Incomplete response: {}", io)),
        other => other,
    })?;

    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(MemlinkError::Protocol(format!(
            "Trailing data after response: {} bytes",
            bytes.len() - consumed
        )));
    }

    Ok(response)
}

/// Read a complete response from a stream
///
/// Blocks until the whole response is received or an error occurs.
pub fn read_response<R: BufRead>(kind: CommandType, reader: &mut R) -> Result<Response> {
    let line = read_line(reader)?;

    if let Some(error) = parse_error_line(&line) {
        return Ok(error);
    }

    match kind {
        CommandType::Get => read_retrieval(&line, reader),
        CommandType::Set | CommandType::Add | CommandType::Delete | CommandType::FlushAll => {
            Ok(Response::Status(StatusCode::from_token(&line)))
        }
        CommandType::Version => match line.strip_prefix("VERSION ") {
            Some(version) => Ok(Response::Version(version.to_string())),
            None => Err(MemlinkError::Protocol(format!(
                "Unexpected response to version: {:?}",
                line
            ))),
        },
    }
}

/// Decode the body of a `get` reply whose first line has been read
fn read_retrieval<R: BufRead>(line: &str, reader: &mut R) -> Result<Response> {
    if line == "END" {
        return Ok(Response::Miss);
    }

    let (key, flags, len) = parse_value_header(line)?;
    let data = read_payload(reader, len)?;

    let end = read_line(reader)?;
    if end != "END" {
        return Err(MemlinkError::Protocol(format!(
            "Expected END after value, got {:?}",
            end
        )));
    }

    Ok(Response::Value { key, flags, data })
}

/// Parse `VALUE <key> <flags> <bytes> [<cas>]`
fn parse_value_header(line: &str) -> Result<(String, u32, usize)> {
    let mut parts = line.split(' ');

    if parts.next() != Some("VALUE") {
        return Err(MemlinkError::Protocol(format!(
            "Unexpected response to get: {:?}",
            line
        )));
    }

    let key = parts
        .next()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| MemlinkError::Protocol("VALUE line: missing key".to_string()))?;

    let flags = parts
        .next()
        .and_then(|f| f.parse::<u32>().ok())
        .ok_or_else(|| MemlinkError::Protocol(format!("VALUE line: bad flags in {:?}", line)))?;

    let len = parts
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| MemlinkError::Protocol(format!("VALUE line: bad length in {:?}", line)))?;

    if len > MAX_VALUE_SIZE {
        return Err(MemlinkError::Protocol(format!(
            "Value too large: {} bytes (max {})",
            len, MAX_VALUE_SIZE
        )));
    }

    Ok((key.to_string(), flags, len))
}

/// Read `len` bytes of data plus the trailing CRLF
fn read_payload<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut data = vec![0u8; len + CRLF.len()];

    reader.read_exact(&mut data).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            MemlinkError::Protocol(format!(
                "Truncated value: expected {} bytes of data",
                len
            ))
        } else {
            MemlinkError::Io(e)
        }
    })?;

    if &data[len..] != CRLF {
        return Err(MemlinkError::Protocol(format!(
            "Value length mismatch: {} bytes declared but data not terminated by CRLF",
            len
        )));
    }

    data.truncate(len);
    Ok(data)
}

/// Recognise `ERROR`, `CLIENT_ERROR ...` and `SERVER_ERROR ...`
fn parse_error_line(line: &str) -> Option<Response> {
    let is_error = line == "ERROR"
        || line.starts_with("CLIENT_ERROR")
        || line.starts_with("SERVER_ERROR");

    is_error.then(|| Response::Error(line.to_string()))
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let limit = (MAX_LINE_LENGTH + CRLF.len()) as u64;
    let mut line = Vec::with_capacity(64);

    let n = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(MemlinkError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed by server",
        )));
    }

    if !line.ends_with(b"\n") {
        if line.len() as u64 >= limit {
            return Err(MemlinkError::Protocol(format!(
                "Response line exceeds {} bytes",
                MAX_LINE_LENGTH
            )));
        }
        return Err(MemlinkError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-line",
        )));
    }

    if !line.ends_with(CRLF) {
        return Err(MemlinkError::Protocol(
            "Response line not terminated by CRLF".to_string(),
        ));
    }
    line.truncate(line.len() - CRLF.len());

    String::from_utf8(line)
        .map_err(|_| MemlinkError::Protocol("Response line is not valid UTF-8".to_string()))
}
