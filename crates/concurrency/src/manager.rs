//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Structural checks (malformed batches are rejected with BADREQ)
//! 2. Validation of every read precondition against one store snapshot
//! 3. Storage application of every write, or of none
//! 4. Result shaping
//!
//! Core invariants:
//! - All-or-nothing commit: a batch's writes either ALL land or NONE do
//! - Each written key's version advances exactly once per commit
//! - Aborts and pure reads never change a version
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. check_request()    - empty / unsupported op / over limits => BADREQ
//! 2. choose the view     - the store, or its cleared form for a reset request
//! 3. validate_reads()   - collect every failed precondition against the view
//! 4. IF conflicts: ABORT, report current state of each failed read
//! 5. IF no writes: OK, echo every read
//! 6. plan new entries   - compute next version per distinct written key
//! 7. apply to storage   - install the reset (if any) and all planned entries
//! 8. OK, one UPDATED per write
//! ```
//!
//! Nothing is mutated before step 7, so an abort or an internal fault
//! (version overflow in step 6) never leaves a partially applied batch or
//! a half-done reset behind.
//!
//! The manager holds no store state of its own: callers must give it
//! exclusive access to the store for the whole sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use gotthard_core::{
    Error, Key, Limits, Operation, ResultOp, Result, Status, TxnRequest, TxnResult, WriteOp,
};
use gotthard_storage::{Store, StoredEntry};
use rustc_hash::FxHashMap;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::validation::{validate_reads, ValidationResult};

/// Why a request was refused without being evaluated
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Rejection {
    /// The batch has no operations
    #[error("empty operation list")]
    Empty,

    /// The batch contains an operation the engine does not execute
    #[error("unsupported operation code {code} at position {position}")]
    Unsupported {
        /// Index in the batch
        position: usize,
        /// Raw operation tag
        code: u8,
    },

    /// The batch is longer than the configured cap
    #[error("{count} operations exceeds limit of {max}")]
    TooManyOperations {
        /// Operations in the batch
        count: usize,
        /// Configured cap
        max: usize,
    },

    /// A written or expected value does not fit a value slot
    #[error("value of {len} bytes at position {position} exceeds limit of {max}")]
    ValueTooLarge {
        /// Index in the batch
        position: usize,
        /// Offending length
        len: usize,
        /// Configured capacity
        max: usize,
    },
}

/// Check a request's structure against `limits`
///
/// Runs before the store is consulted.
pub fn check_request(request: &TxnRequest, limits: &Limits) -> std::result::Result<(), Rejection> {
    let ops = &request.operations;
    if ops.is_empty() {
        return Err(Rejection::Empty);
    }
    if ops.len() > limits.max_ops_per_txn {
        return Err(Rejection::TooManyOperations {
            count: ops.len(),
            max: limits.max_ops_per_txn,
        });
    }

    for (position, op) in ops.iter().enumerate() {
        let value_len = match op {
            Operation::Unsupported { code, .. } => {
                return Err(Rejection::Unsupported {
                    position,
                    code: *code,
                })
            }
            Operation::Read(read) => read.expected_value.as_ref().map_or(0, |v| v.len()),
            Operation::Write(write) => write.value.len(),
        };
        if value_len > limits.max_value_size {
            return Err(Rejection::ValueTooLarge {
                position,
                len: value_len,
                max: limits.max_value_size,
            });
        }
    }

    Ok(())
}

/// Counters of transaction outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Transactions answered OK (commits and pure reads)
    pub committed: u64,
    /// Transactions answered ABORT
    pub aborted: u64,
    /// Transactions answered BADREQ
    pub rejected: u64,
}

/// Validates and commits transaction batches
///
/// TransactionManager coordinates the commit protocol:
/// - Structural checks
/// - Validation against current storage state
/// - Storage application for visibility
///
/// It is `Sync`; outcome counters are atomics so that statistics can be read
/// without taking the store lock.
#[derive(Debug, Default)]
pub struct TransactionManager {
    committed: AtomicU64,
    aborted: AtomicU64,
    rejected: AtomicU64,
}

impl TransactionManager {
    /// Create a new transaction manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the outcome counters
    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            committed: self.committed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// Execute one transaction against `store`
    ///
    /// The caller must hold exclusive access to `store` for the duration of
    /// the call; this is what makes each call serializable with respect to
    /// every other.
    ///
    /// # Returns
    /// - `Ok(TxnResult)` with status OK, ABORT or BADREQ
    /// - `Err(Error::Internal)` if committing would break an invariant; the
    ///   store is left exactly as it was
    pub fn execute(
        &self,
        request: &TxnRequest,
        store: &mut Store,
        limits: &Limits,
    ) -> Result<TxnResult> {
        if let Err(reason) = check_request(request, limits) {
            warn!(
                client_id = request.client_id.0,
                request_id = request.request_id.0,
                %reason,
                "Rejecting malformed transaction"
            );
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Ok(TxnResult::bad_request(request.client_id, request.request_id));
        }

        // A reset request is judged against the store as the reset would
        // leave it; the reset itself only lands if the outcome is OK.
        let reset_view = request.reset.then(|| store.cleared());
        let view = reset_view.as_ref().unwrap_or(&*store);

        let validation = validate_reads(&request.operations, view);
        if !validation.is_valid() {
            self.aborted.fetch_add(1, Ordering::Relaxed);
            return Ok(self.abort(request, validation));
        }

        let writes: Vec<&WriteOp> = request
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Write(w) => Some(w),
                _ => None,
            })
            .collect();

        let (results, staged) = if writes.is_empty() {
            (echo_reads(&request.operations, view), Vec::new())
        } else {
            plan_writes(&writes, view)?
        };

        if let Some(cleared) = reset_view {
            debug!(client_id = request.client_id.0, keys = store.len(), "Resetting store");
            *store = cleared;
        }
        store.apply(staged);

        debug!(
            client_id = request.client_id.0,
            request_id = request.request_id.0,
            writes = writes.len(),
            results = results.len(),
            "Transaction committed"
        );
        self.committed.fetch_add(1, Ordering::Relaxed);

        Ok(TxnResult {
            status: Status::Ok,
            client_id: request.client_id,
            request_id: request.request_id,
            results,
        })
    }

    fn abort(&self, request: &TxnRequest, validation: ValidationResult) -> TxnResult {
        debug!(
            client_id = request.client_id.0,
            request_id = request.request_id.0,
            conflicts = validation.conflict_count(),
            "Transaction aborted"
        );

        let results = validation
            .conflicts
            .into_iter()
            .map(|c| ResultOp::value(c.key, c.current.value, c.current.version))
            .collect();

        TxnResult {
            status: Status::Abort,
            client_id: request.client_id,
            request_id: request.request_id,
            results,
        }
    }
}

/// One VALUE entry per read, in request order
fn echo_reads(operations: &[Operation], store: &Store) -> Vec<ResultOp> {
    operations
        .iter()
        .filter_map(|op| match op {
            Operation::Read(read) => {
                let current = store.get(read.key);
                Some(ResultOp::value(
                    read.key,
                    current.value.clone(),
                    current.version,
                ))
            }
            _ => None,
        })
        .collect()
}

/// Plan every write of a validated batch against `store`
///
/// A key written several times gets one version bump and keeps the last
/// value; each write still yields its own UPDATED entry. Nothing is
/// installed here, so a version overflow leaves every store untouched.
fn plan_writes(
    writes: &[&WriteOp],
    store: &Store,
) -> Result<(Vec<ResultOp>, Vec<(Key, StoredEntry)>)> {
    let mut slots: FxHashMap<Key, usize> = FxHashMap::default();
    let mut staged: Vec<(Key, StoredEntry)> = Vec::with_capacity(writes.len());

    for write in writes {
        match slots.get(&write.key) {
            Some(&slot) => staged[slot].1.value = write.value.clone(),
            None => {
                let version = store.next_version(write.key).ok_or_else(|| {
                    Error::internal(format!("version overflow on key {}", write.key))
                })?;
                slots.insert(write.key, staged.len());
                staged.push((write.key, StoredEntry::new(write.value.clone(), version)));
            }
        }
    }

    let results = writes
        .iter()
        .map(|write| {
            let version = slots
                .get(&write.key)
                .map(|&slot| staged[slot].1.version)
                .ok_or_else(|| Error::internal(format!("unstaged write to key {}", write.key)))?;
            Ok(ResultOp::updated(write.key, write.value.clone(), version))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((results, staged))
}
