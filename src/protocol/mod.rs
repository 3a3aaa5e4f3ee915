//! Protocol Module
//!
//! Stateless translation between requests and memcached text-protocol frames.
//!
//! ## Commands
//! - `get`       - Payload: key
//! - `set`/`add` - Payload: key, flags, exptime, byte count, data block
//! - `delete`    - Payload: key
//! - `flush_all` - Payload: empty
//! - `version`   - Payload: empty
//!
//! ## Status Tokens
//! - `STORED`, `DELETED`, `OK` -> SUCCESS
//! - `NOT_STORED`              -> NOTSTORED
//! - `NOT_FOUND`               -> NOTFOUND
//! - `EXISTS`                  -> EXISTS
//! - anything else             -> UNKNOWN

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{
    Response, StatusCode, MEMCACHED_NOTFOUND, MEMCACHED_NOTSTORED, MEMCACHED_SUCCESS, NOTFOUND,
    NOTSTORED, SUCCESS,
};
pub use codec::{
    decode_response, encode_command, read_response, write_command, CRLF, MAX_LINE_LENGTH,
    MAX_VALUE_SIZE,
};
