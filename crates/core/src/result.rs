//! Transaction outcomes
//!
//! | Status | Results |
//! |--------|---------|
//! | `Ok` with writes | one `Updated` per write, request order |
//! | `Ok`, pure read | one `Value` per read, request order |
//! | `Abort` | one `Value` per failed read, carrying the current state |
//! | `BadRequest` | empty |

use serde::{Deserialize, Serialize};

use crate::operation::OpCode;
use crate::types::{ClientId, Key, RequestId, Value, Version};

/// Outcome class of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// Writes committed, or pure read served
    Ok = 0,
    /// A precondition failed; nothing was written
    Abort = 1,
    /// Malformed or unsupported request; nothing was written
    BadRequest = 3,
}

impl Status {
    /// Wire tag
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short uppercase name used in logs and CLI output
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Abort => "ABORT",
            Status::BadRequest => "BADREQ",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = u8;

    fn try_from(raw: u8) -> std::result::Result<Self, Self::Error> {
        match raw {
            0 => Ok(Status::Ok),
            1 => Ok(Status::Abort),
            3 => Ok(Status::BadRequest),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a result entry reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    /// Current value of a key (read outcome or failed precondition)
    Value,
    /// The key was just written
    Updated,
}

impl ResultKind {
    /// Operation tag used for this kind on the wire
    pub const fn op_code(self) -> OpCode {
        match self {
            ResultKind::Value => OpCode::Value,
            ResultKind::Updated => OpCode::Updated,
        }
    }
}

impl TryFrom<OpCode> for ResultKind {
    type Error = OpCode;

    fn try_from(code: OpCode) -> std::result::Result<Self, Self::Error> {
        match code {
            OpCode::Value => Ok(ResultKind::Value),
            OpCode::Updated => Ok(ResultKind::Updated),
            other => Err(other),
        }
    }
}

/// One entry of a transaction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultOp {
    /// Key reported on
    pub key: Key,
    /// Read outcome or write outcome
    pub kind: ResultKind,
    /// Current value (`Value`) or newly stored value (`Updated`)
    pub value: Value,
    /// Current version (`Value`) or newly assigned version (`Updated`)
    pub version: Version,
}

impl ResultOp {
    /// A `Value` entry
    pub fn value(key: Key, value: Value, version: Version) -> Self {
        ResultOp {
            key,
            kind: ResultKind::Value,
            value,
            version,
        }
    }

    /// An `Updated` entry
    pub fn updated(key: Key, value: Value, version: Version) -> Self {
        ResultOp {
            key,
            kind: ResultKind::Updated,
            value,
            version,
        }
    }
}

/// Response to a [`TxnRequest`](crate::TxnRequest)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnResult {
    /// Outcome class
    pub status: Status,
    /// Echoed from the request
    pub client_id: ClientId,
    /// Echoed from the request
    pub request_id: RequestId,
    /// Ordered result entries
    pub results: Vec<ResultOp>,
}

impl TxnResult {
    /// A BADREQ result for the given correlation ids
    pub fn bad_request(client_id: ClientId, request_id: RequestId) -> Self {
        TxnResult {
            status: Status::BadRequest,
            client_id,
            request_id,
            results: Vec::new(),
        }
    }

    /// True if the status is `Ok`
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// True if the status is `Abort`
    #[inline]
    pub fn is_abort(&self) -> bool {
        self.status == Status::Abort
    }

    /// First result entry for `key`, if any
    pub fn op(&self, key: impl Into<Key>) -> Option<&ResultOp> {
        let key = key.into();
        self.results.iter().find(|r| r.key == key)
    }
}
