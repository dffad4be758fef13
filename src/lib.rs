//! Gotthard - optimistic transactional key-value store
//!
//! Clients submit a whole transaction in one round trip: an ordered batch of
//! reads (each optionally stating the value and/or version it expects) and
//! writes. The store checks every expectation against its current state and
//! either applies all writes (OK), applies nothing and reports the actual
//! state of each failed read (ABORT), or rejects the batch (BADREQ).
//!
//! # Quick Start
//!
//! ```
//! use gotthard::{Database, Session, Status, TxnBuilder, Version};
//!
//! let db = Database::new();
//! let mut session = Session::new(db);
//!
//! let result = session.execute(TxnBuilder::new().write(1, "a")).unwrap();
//! assert_eq!(result.status, Status::Ok);
//!
//! // Conditional update: only if key 1 is still at version 1
//! let result = session
//!     .execute(
//!         TxnBuilder::new()
//!             .read_expecting_version(1, Version::new(1))
//!             .write(1, "b"),
//!     )
//!     .unwrap();
//! assert_eq!(result.status, Status::Ok);
//! ```
//!
//! # Architecture
//!
//! - `gotthard-core`: data model, operations, results, limits, errors
//! - `gotthard-storage`: the key to (value, version) map
//! - `gotthard-concurrency`: precondition validation and commit/abort
//! - `gotthard-engine`: the locked `Database`, sessions, configuration
//! - `gotthard-wire`: binary framing and message codec
//! - `gotthard-server` / `gotthard-client`: TCP front end and client

pub use gotthard_core::{
    ClientId, Error, Key, Limits, OpCode, Operation, ReadOp, RequestId, Result, ResultKind,
    ResultOp, Status, TxnBuilder, TxnRequest, TxnResult, Value, Version, WriteOp,
};
pub use gotthard_engine::{
    CasOutcome, Database, EngineConfig, EngineStats, RetryConfig, Session,
};

/// Network protocol, server and client
pub mod net {
    pub use gotthard_client::{
        run_increment_clients, Client, ClientReport, Error as ClientError, IncrementOutcome,
    };
    pub use gotthard_server::{Server, ServerConfig};
    pub use gotthard_wire::{
        decode_hello, decode_request, decode_response, encode_hello, encode_request,
        encode_response, read_frame, write_frame, DecodeError, EncodeError, Header, FLAG_HELLO,
        FLAG_RESET, FLAG_RESPONSE, HEADER_LEN, MAX_FRAME_LEN,
    };
}

/// Lower layers, for embedding and testing
pub mod internals {
    pub use gotthard_concurrency::{check_request, validate_reads, Rejection, TransactionManager};
    pub use gotthard_storage::{Store, StoredEntry};
}
