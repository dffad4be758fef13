//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub use gotthard::internals::StoredEntry;
pub use gotthard::net::{run_increment_clients, Client, ClientReport, Server, ServerConfig};
pub use gotthard::{
    CasOutcome, ClientId, Database, EngineConfig, Error, Key, Operation, RequestId, ResultKind,
    ResultOp, RetryConfig, Session, Status, TxnBuilder, TxnRequest, TxnResult, Value, Version,
};

/// Largest key exercised by the 20-bit key tests
pub const KEY_20_BITS: u32 = (1 << 20) - 1;

static NEXT_REQUEST: AtomicU32 = AtomicU32::new(1);

// ============================================================================
// In-process helpers
// ============================================================================

/// Wrap a batch in a request with a fresh request id
pub fn request(ops: impl Into<Vec<Operation>>) -> TxnRequest {
    TxnRequest::new(
        ClientId(1),
        RequestId(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed)),
        ops.into(),
    )
}

/// Execute a batch, panicking on engine faults
pub fn exec(db: &Database, ops: impl Into<Vec<Operation>>) -> TxnResult {
    db.execute(&request(ops)).expect("engine fault")
}

/// Write each `(key, value)` in its own transaction
pub fn seed(db: &Database, entries: &[(u32, &str)]) {
    for (key, value) in entries {
        let result = exec(db, TxnBuilder::new().write(*key, *value));
        assert_eq!(result.status, Status::Ok, "seeding key {} failed", key);
    }
}

/// Current entries of `keys`, in order
pub fn snapshot(db: &Database, keys: &[u32]) -> Vec<StoredEntry> {
    keys.iter().map(|k| db.entry(Key::new(*k))).collect()
}

/// A VALUE result entry
pub fn value_op(key: u32, value: &str, version: u64) -> ResultOp {
    ResultOp::value(Key::new(key), Value::from(value), Version::new(version))
}

/// An UPDATED result entry
pub fn updated_op(key: u32, value: &str, version: u64) -> ResultOp {
    ResultOp::updated(Key::new(key), Value::from(value), Version::new(version))
}

// ============================================================================
// Network helpers
// ============================================================================

/// Start a server on an ephemeral port, returning its address and database
pub async fn start_server() -> (SocketAddr, Arc<Database>) {
    let config = ServerConfig {
        listen: "127.0.0.1:0".to_string(),
        ..ServerConfig::default()
    };
    let db = Database::new();
    let server = Server::bind(&config, Arc::clone(&db))
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().expect("no local addr");
    tokio::spawn(server.run());
    (addr, db)
}
