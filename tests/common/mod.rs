//! Test fixtures
//!
//! In-process stand-ins for a memcached server so the suites need no
//! external daemon. Each test starts its own server, which gives every
//! case a fresh, empty cache.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

pub const MOCK_VERSION: &str = "1.6.21-mock";

struct Item {
    data: Vec<u8>,
    flags: u32,
    expires_at: Option<Instant>,
}

impl Item {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

type Store = Arc<Mutex<HashMap<String, Item>>>;

// =============================================================================
// MockServer
// =============================================================================

/// A tiny memcached speaking get/set/add/delete/flush_all/version
pub struct MockServer {
    addr: SocketAddr,
}

impl MockServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let store: Store = Arc::new(Mutex::new(HashMap::new()));

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let _ = serve(stream, store);
                });
            }
        });

        Self { addr }
    }

    /// `"127.0.0.1:<port>"`
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

fn serve(stream: TcpStream, store: Store) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let parts: Vec<&str> = line.trim_end_matches("\r\n").split(' ').collect();

        let reply: Vec<u8> = match parts.as_slice() {
            ["get", key] => {
                let mut out = Vec::new();
                let mut items = store.lock().unwrap();
                let live = items
                    .get(*key)
                    .filter(|item| item.is_live())
                    .map(|item| (item.flags, item.data.clone()));
                match live {
                    Some((flags, data)) => {
                        out.extend_from_slice(
                            format!("VALUE {} {} {}\r\n", key, flags, data.len()).as_bytes(),
                        );
                        out.extend_from_slice(&data);
                        out.extend_from_slice(b"\r\n");
                    }
                    None => {
                        items.remove(*key);
                    }
                }
                out.extend_from_slice(b"END\r\n");
                out
            }
            [cmd @ ("set" | "add"), key, flags, exptime, len] => {
                let len: usize = len.parse().unwrap();
                let mut data = vec![0u8; len + 2];
                reader.read_exact(&mut data)?;
                data.truncate(len);

                let exptime: u64 = exptime.parse().unwrap();
                let item = Item {
                    data,
                    flags: flags.parse().unwrap(),
                    expires_at: (exptime > 0)
                        .then(|| Instant::now() + Duration::from_secs(exptime)),
                };

                let mut items = store.lock().unwrap();
                let present = items.get(*key).map_or(false, |item| item.is_live());
                if *cmd == "add" && present {
                    b"NOT_STORED\r\n".to_vec()
                } else {
                    items.insert(key.to_string(), item);
                    b"STORED\r\n".to_vec()
                }
            }
            ["delete", key] => match store.lock().unwrap().remove(*key) {
                Some(item) if item.is_live() => b"DELETED\r\n".to_vec(),
                _ => b"NOT_FOUND\r\n".to_vec(),
            },
            ["flush_all"] => {
                store.lock().unwrap().clear();
                b"OK\r\n".to_vec()
            }
            ["version"] => format!("VERSION {}\r\n", MOCK_VERSION).into_bytes(),
            ["quit"] => return Ok(()),
            _ => b"ERROR\r\n".to_vec(),
        };

        writer.write_all(&reply)?;
        writer.flush()?;
    }
}

// =============================================================================
// ScriptedServer
// =============================================================================

/// Answers the first request on the first connection with canned bytes
pub struct ScriptedServer {
    addr: SocketAddr,
}

impl ScriptedServer {
    /// After replying, hang up if `then_close`, otherwise wait for the
    /// client to disconnect.
    pub fn start(reply: &'static [u8], then_close: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else { return };
            let _ = answer_once(stream, reply, then_close);
        });

        Self { addr }
    }

    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }
}

fn answer_once(stream: TcpStream, reply: &[u8], then_close: bool) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.starts_with("set ") || line.starts_with("add ") {
        let mut data = String::new();
        reader.read_line(&mut data)?;
    }

    writer.write_all(reply)?;
    writer.flush()?;

    if !then_close {
        let mut rest = Vec::new();
        let _ = reader.read_to_end(&mut rest);
    }
    Ok(())
}

/// A port nothing is listening on
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
