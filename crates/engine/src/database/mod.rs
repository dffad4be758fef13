//! Database struct and transaction entry point
//!
//! The `Database` owns the key-value store and serializes every transaction
//! through one lock:
//! - Admission (`check_request`) and BADREQ shaping
//! - The optional store reset
//! - Read validation, then commit or abort
//!
//! Holding the lock for the whole `execute` call is what makes the check of
//! a read's expectations and the application of the batch's writes atomic
//! with respect to every other transaction.
//!
//! ## Usage
//!
//! ```
//! use gotthard_core::{ClientId, RequestId, TxnBuilder, TxnRequest, Status};
//! use gotthard_engine::Database;
//!
//! let db = Database::new();
//! let ops = TxnBuilder::new().write(1, "hello").build();
//! let result = db
//!     .execute(&TxnRequest::new(ClientId(1), RequestId(1), ops))
//!     .unwrap();
//! assert_eq!(result.status, Status::Ok);
//! ```

pub mod config;
mod transactions;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use transactions::RetryConfig;

use gotthard_concurrency::TransactionManager;
use gotthard_core::{ClientId, Key, Limits, Result, TxnRequest, TxnResult};
use gotthard_storage::{Store, StoredEntry};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Point-in-time engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Transactions that returned OK
    pub committed: u64,
    /// Transactions that returned ABORT
    pub aborted: u64,
    /// Transactions that returned BADREQ
    pub rejected: u64,
    /// Keys currently holding a written entry
    pub keys: usize,
}

/// In-memory transactional key-value database
///
/// Shared between connections as `Arc<Database>`.
#[derive(Debug)]
pub struct Database {
    store: Mutex<Store>,
    manager: TransactionManager,
    config: EngineConfig,
    limits: Limits,
    next_client_id: AtomicU32,
}

impl Database {
    /// Create a database with the default configuration
    pub fn new() -> Arc<Self> {
        Self::build(EngineConfig::default())
    }

    /// Create a database with a validated configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is unusable.
    pub fn with_config(config: EngineConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Arc<Self> {
        info!(
            target: "gotthard::db",
            max_value_size = config.max_value_size,
            max_ops_per_txn = config.max_ops_per_txn,
            "Database created"
        );
        Arc::new(Self {
            store: Mutex::new(Store::new()),
            manager: TransactionManager::new(),
            limits: config.limits(),
            config,
            next_client_id: AtomicU32::new(1),
        })
    }

    /// Execute one transaction atomically
    ///
    /// # Returns
    /// - `Ok(TxnResult)` with status OK, ABORT or BADREQ
    /// - `Err(Error::Internal)` if the batch could not be applied without
    ///   breaking a store invariant; the store is unchanged
    pub fn execute(&self, request: &TxnRequest) -> Result<TxnResult> {
        let mut store = self.store.lock();
        let outcome = self.manager.execute(request, &mut store, &self.limits);
        if let Err(e) = &outcome {
            error!(
                target: "gotthard::db",
                client_id = request.client_id.0,
                request_id = request.request_id.0,
                error = %e,
                "Transaction failed"
            );
        }
        outcome
    }

    /// Hand out a fresh client id (starting at 1)
    pub fn register_client(&self) -> ClientId {
        ClientId(self.next_client_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Clear every key back to the empty value at version 0
    ///
    /// Versions assigned afterwards continue above every version assigned
    /// before the reset.
    pub fn reset(&self) {
        let mut store = self.store.lock();
        info!(target: "gotthard::db", keys = store.len(), "Store reset");
        store.clear();
    }

    /// Current entry for `key` (empty at version 0 if never written)
    pub fn entry(&self, key: Key) -> StoredEntry {
        self.store.lock().get(key).clone()
    }

    /// Outcome counters and store size
    pub fn stats(&self) -> EngineStats {
        let keys = self.store.lock().len();
        let manager = self.manager.stats();
        EngineStats {
            committed: manager.committed,
            aborted: manager.aborted,
            rejected: manager.rejected,
            keys,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active request limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}
