//! Transaction operations and requests
//!
//! A transaction is a single round trip: an ordered batch of [`Operation`]s
//! that the engine validates and then commits or aborts as a whole.

use serde::{Deserialize, Serialize};

use crate::types::{ClientId, Key, RequestId, Value, Version};

/// Protocol operation tags
///
/// The numbering is shared by requests and responses: requests carry
/// `Read`, `Write` or `Value` (a read whose carried value is the expected
/// value), responses carry `Value` and `Updated`. `Nop` is a placeholder
/// the engine never executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OpCode {
    /// Placeholder, rejected by the engine
    Nop = 0,
    /// Read a key, optionally conditioned on an expected value and/or version
    Read = 1,
    /// Write a value to a key
    Write = 2,
    /// The value of a key (read outcome, or a caller's belief about it)
    Value = 3,
    /// The key was just updated to this value
    Updated = 4,
}

impl OpCode {
    /// Wire tag
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(raw: u8) -> std::result::Result<Self, Self::Error> {
        match raw {
            0 => Ok(OpCode::Nop),
            1 => Ok(OpCode::Read),
            2 => Ok(OpCode::Write),
            3 => Ok(OpCode::Value),
            4 => Ok(OpCode::Updated),
            other => Err(other),
        }
    }
}

/// Read of a single key with optional preconditions
///
/// With neither expectation set the read is unconditioned and always
/// matches. With both set, both must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOp {
    /// Key to read
    pub key: Key,
    /// Value the caller expects the key to hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<Value>,
    /// Version the caller expects the key to be at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<Version>,
}

impl ReadOp {
    /// True if this read carries at least one precondition
    #[inline]
    pub fn is_conditional(&self) -> bool {
        self.expected_value.is_some() || self.expected_version.is_some()
    }
}

/// Write of a value to a single key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOp {
    /// Key to write
    pub key: Key,
    /// Value to store
    pub value: Value,
}

/// One operation of a transaction batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Read, possibly conditioned
    Read(ReadOp),
    /// Unconditional write
    Write(WriteOp),
    /// An operation tag the engine does not execute (e.g. `Nop`).
    /// Any batch containing one is rejected with BADREQ.
    Unsupported {
        /// Raw operation tag as received
        code: u8,
        /// Key the operation addressed
        key: Key,
    },
}

impl Operation {
    /// Unconditioned read
    pub fn read(key: impl Into<Key>) -> Self {
        Operation::Read(ReadOp {
            key: key.into(),
            expected_value: None,
            expected_version: None,
        })
    }

    /// Write `value` to `key`
    pub fn write(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Operation::Write(WriteOp {
            key: key.into(),
            value: value.into(),
        })
    }

    /// The no-op placeholder
    pub fn nop(key: impl Into<Key>) -> Self {
        Operation::Unsupported {
            code: OpCode::Nop.as_u8(),
            key: key.into(),
        }
    }

    /// Key this operation addresses
    pub fn key(&self) -> Key {
        match self {
            Operation::Read(r) => r.key,
            Operation::Write(w) => w.key,
            Operation::Unsupported { key, .. } => *key,
        }
    }

    /// True for `Write`
    #[inline]
    pub fn is_write(&self) -> bool {
        matches!(self, Operation::Write(_))
    }
}

/// A transaction as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnRequest {
    /// Connection the request arrived on
    pub client_id: ClientId,
    /// Caller's sequence number, echoed for correlation
    pub request_id: RequestId,
    /// Clear the whole store before executing the batch
    #[serde(default)]
    pub reset: bool,
    /// Ordered batch
    pub operations: Vec<Operation>,
}

impl TxnRequest {
    /// Create a request without the reset flag
    pub fn new(client_id: ClientId, request_id: RequestId, operations: Vec<Operation>) -> Self {
        TxnRequest {
            client_id,
            request_id,
            reset: false,
            operations,
        }
    }

    /// Set the reset flag
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Number of write operations in the batch
    pub fn write_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_write()).count()
    }
}

/// Fluent builder for operation batches
///
/// ```
/// use gotthard_core::{TxnBuilder, Version};
///
/// let ops = TxnBuilder::new()
///     .read_expecting_version(1, Version::new(3))
///     .write(1, "4")
///     .build();
/// assert_eq!(ops.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TxnBuilder {
    operations: Vec<Operation>,
}

impl TxnBuilder {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditioned read
    pub fn read(mut self, key: impl Into<Key>) -> Self {
        self.operations.push(Operation::read(key));
        self
    }

    /// Read that requires the key to hold `value`
    pub fn read_expecting_value(self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.read_with(key, Some(value.into()), None)
    }

    /// Read that requires the key to be at `version`
    pub fn read_expecting_version(self, key: impl Into<Key>, version: Version) -> Self {
        self.read_with(key, None, Some(version))
    }

    /// Read that requires both `value` and `version`
    pub fn read_expecting(
        self,
        key: impl Into<Key>,
        value: impl Into<Value>,
        version: Version,
    ) -> Self {
        self.read_with(key, Some(value.into()), Some(version))
    }

    /// Read with explicit optional expectations
    pub fn read_with(
        mut self,
        key: impl Into<Key>,
        expected_value: Option<Value>,
        expected_version: Option<Version>,
    ) -> Self {
        self.operations.push(Operation::Read(ReadOp {
            key: key.into(),
            expected_value,
            expected_version,
        }));
        self
    }

    /// Write `value` to `key`
    pub fn write(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.operations.push(Operation::write(key, value));
        self
    }

    /// Append the no-op placeholder
    pub fn nop(mut self, key: impl Into<Key>) -> Self {
        self.operations.push(Operation::nop(key));
        self
    }

    /// Append an arbitrary operation
    pub fn push(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Number of operations so far
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True if no operation has been added
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Finish the batch
    pub fn build(self) -> Vec<Operation> {
        self.operations
    }
}

impl From<TxnBuilder> for Vec<Operation> {
    fn from(builder: TxnBuilder) -> Self {
        builder.build()
    }
}
