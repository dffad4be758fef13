//! Server error type

use gotthard_wire::{DecodeError, EncodeError};
use std::io;
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that end a listener or a single connection
#[derive(Debug, Error)]
pub enum ServerError {
    /// Socket setup or accept failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Engine construction or configuration failed
    #[error(transparent)]
    Engine(#[from] gotthard_core::Error),

    /// Peer sent a frame that could not be read at all
    #[error("unreadable frame: {0}")]
    Decode(#[from] DecodeError),

    /// Response could not be written
    #[error("failed to send response: {0}")]
    Encode(#[from] EncodeError),
}
