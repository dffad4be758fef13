//! Client error type

use gotthard_core::{Key, Value};
use gotthard_wire::{DecodeError, EncodeError};
use std::io;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Client`](crate::Client)
#[derive(Debug, Error)]
pub enum Error {
    /// Connecting or talking to the server failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Server sent something that is not a valid message
    #[error("bad response: {0}")]
    Decode(#[from] DecodeError),

    /// Request could not be encoded or sent
    #[error("failed to send request: {0}")]
    Encode(#[from] EncodeError),

    /// Server answered out of protocol (wrong ids, BADREQ, early close)
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Key does not hold a decimal counter
    #[error("key {key} holds {value:?}, not a counter")]
    NotACounter {
        /// Key that was incremented
        key: Key,
        /// What it held instead
        value: Value,
    },

    /// Counter already holds the largest representable value
    #[error("counter at key {key} cannot go past {max}", max = u64::MAX)]
    CounterOverflow {
        /// Key that was incremented
        key: Key,
    },
}
