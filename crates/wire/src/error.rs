//! Codec error types

use std::io;
use thiserror::Error;

use gotthard_core::Key;

/// Errors decoding a frame or message body
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body ended before a field could be read
    #[error("truncated message: needed {needed} more bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the next field needs
        needed: usize,
        /// Bytes left in the body
        remaining: usize,
    },

    /// Length prefix exceeds the frame limit
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge {
        /// Announced body length
        len: usize,
        /// Largest accepted body
        max: usize,
    },

    /// Request where a response was expected, or the other way round
    #[error("unexpected message direction (flags {flags:#04x})")]
    UnexpectedDirection {
        /// Flags byte as received
        flags: u8,
    },

    /// An operation lacks a field its code requires
    #[error("operation on key {key} is missing its {field}")]
    MissingField {
        /// Key of the offending operation
        key: Key,
        /// Name of the missing field
        field: &'static str,
    },

    /// Status byte is not a known status
    #[error("invalid status byte {0}")]
    InvalidStatus(u8),

    /// Result entry code is neither VALUE nor UPDATED
    #[error("invalid result code {0}")]
    InvalidResultKind(u8),

    /// Bytes left over after the announced operations
    #[error("{0} trailing bytes after last operation")]
    TrailingBytes(usize),

    /// Socket read failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors encoding a message or writing a frame
#[derive(Debug, Error)]
pub enum EncodeError {
    /// More operations than the one-byte count can carry
    #[error("{0} operations exceed the per-message limit of 255")]
    TooManyOperations(usize),

    /// Value longer than the two-byte length can carry
    #[error("value of {len} bytes on key {key} is too long to encode")]
    ValueTooLong {
        /// Key the value belongs to
        key: Key,
        /// Value length in bytes
        len: usize,
    },

    /// Encoded body exceeds the frame limit
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge {
        /// Body length
        len: usize,
        /// Largest accepted body
        max: usize,
    },

    /// Socket write failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// True if the peer went away mid-frame or the socket failed
    pub fn is_io(&self) -> bool {
        matches!(self, DecodeError::Io(_))
    }
}
