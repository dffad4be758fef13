//! Foundational identifiers and values
//!
//! - Key: 32-bit key addressing one slot of the store
//! - Value: length-delimited byte string stored under a key
//! - Version: per-key commit counter used as an OCC fencing token
//! - ClientId / RequestId: correlation identifiers echoed on every response

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key addressing a single slot in the store
///
/// Every key in `0..=u32::MAX` is addressable. Keys are never declared up
/// front: an unreferenced key reads as an empty value at version 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(u32);

impl Key {
    /// Create a key from its numeric form
    pub const fn new(raw: u32) -> Self {
        Key(raw)
    }

    /// Numeric form of the key
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Key {
    fn from(raw: u32) -> Self {
        Key(raw)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte string stored under a key
///
/// Values are length-delimited: embedded NUL bytes are content, not
/// terminators. Callers that exchange fixed-size, NUL-padded buffers should
/// go through [`Value::from_padded`].
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(Vec<u8>);

impl Value {
    /// The empty value every key holds before its first write
    pub const fn empty() -> Self {
        Value(Vec::new())
    }

    /// Wrap raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Value(bytes.into())
    }

    /// Build a value from a fixed-size buffer, stripping trailing NUL padding
    pub fn from_padded(buf: &[u8]) -> Self {
        let end = buf.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        Value(buf[..end].to_vec())
    }

    /// Logical content
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the logical content in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty value
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Content as UTF-8, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Consume and return the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Value({:?})", s),
            None => write!(f, "Value({:?})", self.0),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value(bytes)
    }
}

/// Per-key commit counter
///
/// ## Invariants
///
/// - Starts at 0 for every key
/// - Incremented exactly once by each committed transaction that writes the key
/// - Never changes on abort or on a pure read
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version of a key that has never been written
    pub const ZERO: Version = Version(0);

    /// Create a version from its numeric form
    pub const fn new(raw: u64) -> Self {
        Version(raw)
    }

    /// Numeric form of the version
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The version a commit produces, or `None` on overflow
    #[inline]
    pub const fn checked_next(&self) -> Option<Version> {
        match self.0.checked_add(1) {
            Some(v) => Some(Version(v)),
            None => None,
        }
    }
}

impl From<u64> for Version {
    fn from(raw: u64) -> Self {
        Version(raw)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Identifier the server assigns to a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-assigned, per-connection request sequence number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u32);

impl RequestId {
    /// The following request id, wrapping at `u32::MAX`
    pub const fn next(&self) -> RequestId {
        RequestId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
