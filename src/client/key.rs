//! Key and value normalization
//!
//! Callers may address an item with plain text or with an atom-like
//! [`Symbol`]; both reduce to the same key text. Values are stored as the
//! `Display` form of whatever was passed in.

use std::borrow::Cow;
use std::fmt;

use crate::error::{MemlinkError, Result};

/// Longest key memcached accepts
pub const MAX_KEY_LENGTH: usize = 250;

/// An atom-like key name
///
/// `Symbol::new("foo")` and `"foo"` address the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Cow<'static, str>);

impl Symbol {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Symbol {
    fn from(name: &'static str) -> Self {
        Symbol(Cow::Borrowed(name))
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(Cow::Owned(name))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything usable as a key: text or a symbol
pub trait ToKeyText {
    /// Textual form sent on the wire
    fn key_text(&self) -> &str;
}

impl ToKeyText for str {
    fn key_text(&self) -> &str {
        self
    }
}

impl ToKeyText for String {
    fn key_text(&self) -> &str {
        self
    }
}

impl ToKeyText for Cow<'_, str> {
    fn key_text(&self) -> &str {
        self
    }
}

impl ToKeyText for Symbol {
    fn key_text(&self) -> &str {
        self.name()
    }
}

impl<T: ToKeyText + ?Sized> ToKeyText for &T {
    fn key_text(&self) -> &str {
        (**self).key_text()
    }
}

/// Normalize and validate a key
///
/// Keys must be 1 to 250 bytes with no whitespace or control characters.
pub fn to_key_text<K: ToKeyText + ?Sized>(key: &K) -> Result<String> {
    let text = key.key_text();

    if text.is_empty() {
        return Err(MemlinkError::InvalidKey("key is empty".to_string()));
    }
    if text.len() > MAX_KEY_LENGTH {
        return Err(MemlinkError::InvalidKey(format!(
            "key is {} bytes (max {})",
            text.len(),
            MAX_KEY_LENGTH
        )));
    }
    if let Some(c) = text.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(MemlinkError::InvalidKey(format!(
            "key {:?} contains forbidden character {:?}",
            text, c
        )));
    }

    Ok(text.to_string())
}

/// Normalize a value to the text that gets stored
///
/// Lossy: numbers come back from `get` as their decimal text.
pub fn to_value_text<V: fmt::Display + ?Sized>(value: &V) -> String {
    value.to_string()
}
