//! Network Module
//!
//! TCP connection to a single memcached server.
//!
//! ## Model
//! - One connection per client, opened eagerly
//! - One request in flight at a time (no pipelining)
//! - Any I/O or protocol failure breaks the connection for good

mod endpoint;
mod connection;

pub use endpoint::Endpoint;
pub use connection::Connection;
