//! Per-client session over a shared database
//!
//! A `Session` stands for one logical client: it owns a client id handed
//! out by the database and numbers its requests. Besides raw batch
//! execution it offers single-key helpers and the compare-and-swap loop
//! used to implement read-modify-write on top of OCC.

use std::sync::Arc;

use gotthard_core::{
    ClientId, Error, Key, Operation, RequestId, Result, ResultOp, Status, TxnBuilder, TxnRequest,
    TxnResult, Value, Version,
};
use tracing::{debug, trace};

use crate::database::{Database, RetryConfig};

/// Outcome of a successful [`Session::cas_update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasOutcome {
    /// Key that was updated
    pub key: Key,
    /// Value that was committed
    pub value: Value,
    /// Version the key was bumped to
    pub version: Version,
    /// Attempts made, including the committing one
    pub attempts: u32,
}

/// One client's view of a [`Database`]
#[derive(Debug)]
pub struct Session {
    db: Arc<Database>,
    client_id: ClientId,
    last_request_id: RequestId,
}

impl Session {
    /// Open a session with a freshly registered client id
    pub fn new(db: Arc<Database>) -> Self {
        let client_id = db.register_client();
        Session {
            db,
            client_id,
            last_request_id: RequestId(0),
        }
    }

    /// This session's client id
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Database this session runs against
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Execute a batch
    ///
    /// Accepts a `Vec<Operation>` or a [`TxnBuilder`].
    pub fn execute(&mut self, operations: impl Into<Vec<Operation>>) -> Result<TxnResult> {
        self.submit(operations.into(), false)
    }

    /// Execute a batch after clearing the whole store
    pub fn execute_with_reset(
        &mut self,
        operations: impl Into<Vec<Operation>>,
    ) -> Result<TxnResult> {
        self.submit(operations.into(), true)
    }

    fn submit(&mut self, operations: Vec<Operation>, reset: bool) -> Result<TxnResult> {
        self.last_request_id = self.last_request_id.next();
        let request =
            TxnRequest::new(self.client_id, self.last_request_id, operations).with_reset(reset);
        self.db.execute(&request)
    }

    /// Current value and version of `key`
    pub fn read(&mut self, key: impl Into<Key>) -> Result<ResultOp> {
        let key = key.into();
        let result = self.execute(vec![Operation::read(key)])?;
        expect_ok(&result)?;
        result
            .op(key)
            .cloned()
            .ok_or_else(|| Error::internal(format!("read of key {} returned no entry", key)))
    }

    /// Blind write; returns the new version
    pub fn write(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<Version> {
        let key = key.into();
        let result = self.execute(vec![Operation::write(key, value)])?;
        expect_ok(&result)?;
        result
            .op(key)
            .map(|op| op.version)
            .ok_or_else(|| Error::internal(format!("write of key {} returned no entry", key)))
    }

    /// Read-modify-write of a single key
    ///
    /// Reads the key, computes the new value with `update`, and submits it
    /// guarded by the observed value and version. On ABORT the returned
    /// state becomes the next guess, so no extra read is needed per retry.
    ///
    /// # Errors
    ///
    /// - `Error::RetriesExhausted` once `retry` allows no more attempts
    /// - `Error::InvalidRequest` if the engine rejects the batch (e.g. the
    ///   computed value is too large)
    pub fn cas_update<F>(
        &mut self,
        key: impl Into<Key>,
        retry: &RetryConfig,
        mut update: F,
    ) -> Result<CasOutcome>
    where
        F: FnMut(&Value) -> Value,
    {
        let key = key.into();
        let current = self.read(key)?;
        let mut value = current.value;
        let mut version = current.version;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let next = update(&value);
            let batch = TxnBuilder::new()
                .read_expecting(key, value.clone(), version)
                .write(key, next.clone());
            let result = self.execute(batch)?;

            match result.status {
                Status::Ok => {
                    let committed = result.op(key).map(|op| op.version).ok_or_else(|| {
                        Error::internal(format!("commit of key {} returned no entry", key))
                    })?;
                    debug!(key = key.as_u32(), attempts, version = %committed, "CAS committed");
                    return Ok(CasOutcome {
                        key,
                        value: next,
                        version: committed,
                        attempts,
                    });
                }
                Status::Abort => {
                    let observed = result.op(key).ok_or_else(|| {
                        Error::internal(format!("abort of key {} returned no entry", key))
                    })?;
                    trace!(key = key.as_u32(), attempts, seen = %observed.version, "CAS conflict");
                    value = observed.value.clone();
                    version = observed.version;

                    if retry.is_exhausted(attempts) {
                        return Err(Error::RetriesExhausted { key, attempts });
                    }
                    let delay = retry.calculate_delay(attempts - 1);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                Status::BadRequest => return Err(rejected(&result)),
            }
        }
    }
}

fn expect_ok(result: &TxnResult) -> Result<()> {
    match result.status {
        Status::Ok => Ok(()),
        _ => Err(rejected(result)),
    }
}

fn rejected(result: &TxnResult) -> Error {
    Error::InvalidRequest(format!(
        "request {} answered with {}",
        result.request_id.0, result.status
    ))
}
