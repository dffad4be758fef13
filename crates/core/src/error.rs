//! Error types for the Gotthard store
//!
//! Precondition conflicts are not errors: they are reported as an ABORT
//! [`TxnResult`](crate::TxnResult). This enum covers configuration problems,
//! I/O, and faults that must stop a single request.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

use crate::types::Key;

/// Result type alias for Gotthard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Gotthard store
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config files, sockets)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Request is structurally invalid
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration value or unparsable config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bounded CAS loop gave up
    #[error("CAS on key {key} still conflicting after {attempts} attempts")]
    RetriesExhausted {
        /// Key being updated
        key: Key,
        /// Attempts made, including the last failing one
        attempts: u32,
    },

    /// Engine invariant violated; the affected request is abandoned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an `Internal` error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
