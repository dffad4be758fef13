//! Core types for the Gotthard store
//!
//! This crate defines the data model shared by the engine and the wire
//! boundary:
//! - Key, Value, Version: what the store holds
//! - Operation, TxnRequest, TxnBuilder: what clients submit
//! - Status, ResultKind, ResultOp, TxnResult: what the engine answers
//! - OpCode: protocol operation tags
//! - Limits: per-request size limits
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod operation;
pub mod result;
pub mod types;

pub use error::{Error, Result};
pub use limits::{
    Limits, DEFAULT_MAX_OPS_PER_TXN, DEFAULT_MAX_VALUE_SIZE, MAX_FRAME_LEN, MAX_OPS_ON_WIRE,
    MESSAGE_HEADER_LEN, RESPONSE_OP_OVERHEAD,
};
pub use operation::{OpCode, Operation, ReadOp, TxnBuilder, TxnRequest, WriteOp};
pub use result::{ResultKind, ResultOp, Status, TxnResult};
pub use types::{ClientId, Key, RequestId, Value, Version};
