//! Connection to a Gotthard server

use std::net::SocketAddr;

use gotthard_core::{
    ClientId, Key, Operation, RequestId, ResultOp, Status, TxnBuilder, TxnRequest, TxnResult,
    Value, Version,
};
use gotthard_wire::{decode_hello, decode_response, encode_request, read_frame, write_frame};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Outcome of [`Client::increment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementOutcome {
    /// Counter value after this increment
    pub value: u64,
    /// Version the increment committed at
    pub version: Version,
    /// Attempts made, including the committing one
    pub attempts: u32,
}

/// One connection, one client id, strictly sequential requests
#[derive(Debug)]
pub struct Client {
    stream: TcpStream,
    peer: SocketAddr,
    client_id: ClientId,
    last_request_id: RequestId,
}

impl Client {
    /// Connect and wait for the server's hello
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;

        let body = read_frame(&mut stream)
            .await?
            .ok_or_else(|| Error::Protocol("connection closed before hello".into()))?;
        let client_id = decode_hello(&body)?;
        debug!(%peer, client_id = client_id.0, "Connected");

        Ok(Client {
            stream,
            peer,
            client_id,
            last_request_id: RequestId(0),
        })
    }

    /// Client id assigned by the server
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Server address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Execute a batch
    pub async fn execute(&mut self, operations: impl Into<Vec<Operation>>) -> Result<TxnResult> {
        self.submit(operations.into(), false).await
    }

    /// Execute a batch after the server clears its store
    pub async fn execute_with_reset(
        &mut self,
        operations: impl Into<Vec<Operation>>,
    ) -> Result<TxnResult> {
        self.submit(operations.into(), true).await
    }

    async fn submit(&mut self, operations: Vec<Operation>, reset: bool) -> Result<TxnResult> {
        self.last_request_id = self.last_request_id.next();
        let request = TxnRequest::new(self.client_id, self.last_request_id, operations)
            .with_reset(reset);

        trace!(request_id = request.request_id.0, ops = request.operations.len(), "Sending");
        write_frame(&mut self.stream, &encode_request(&request)?).await?;

        let body = read_frame(&mut self.stream)
            .await?
            .ok_or_else(|| Error::Protocol("connection closed mid-request".into()))?;
        let result = decode_response(&body)?;

        if result.request_id != request.request_id {
            return Err(Error::Protocol(format!(
                "expected response to request {}, got {}",
                request.request_id, result.request_id
            )));
        }
        if result.client_id != self.client_id {
            return Err(Error::Protocol(format!(
                "response addressed to client {}, we are {}",
                result.client_id, self.client_id
            )));
        }
        Ok(result)
    }

    /// Current value and version of `key`
    pub async fn read(&mut self, key: impl Into<Key>) -> Result<ResultOp> {
        let key = key.into();
        let result = self.execute(vec![Operation::read(key)]).await?;
        expect_ok(&result)?;
        entry_for(&result, key)
    }

    /// Blind write; returns the new version
    pub async fn write(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<Version> {
        let key = key.into();
        let result = self.execute(vec![Operation::write(key, value)]).await?;
        expect_ok(&result)?;
        Ok(entry_for(&result, key)?.version)
    }

    /// Clear the server's store
    ///
    /// Sent as a reset-flagged read of key 0, since an empty batch is
    /// rejected before the reset would apply.
    pub async fn reset(&mut self) -> Result<()> {
        let result = self.execute_with_reset(vec![Operation::read(0)]).await?;
        expect_ok(&result)
    }

    /// Set `key` to `"0"` unless it has been written before
    ///
    /// Returns true if this call initialized it.
    pub async fn initialize_counter(&mut self, key: impl Into<Key>) -> Result<bool> {
        let key = key.into();
        let batch = TxnBuilder::new()
            .read_expecting_version(key, Version::ZERO)
            .write(key, "0");
        let result = self.execute(batch).await?;
        match result.status {
            Status::Ok => Ok(true),
            Status::Abort => Ok(false),
            Status::BadRequest => Err(rejected(&result)),
        }
    }

    /// Add one to the decimal counter at `key`, retrying until it commits
    pub async fn increment(&mut self, key: impl Into<Key>) -> Result<IncrementOutcome> {
        let key = key.into();
        let current = self.read(key).await?;
        let mut value = current.value;
        let mut version = current.version;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let next = next_counter(key, &value)?;
            let batch = TxnBuilder::new()
                .read_expecting_version(key, version)
                .write(key, next.to_string());
            let result = self.execute(batch).await?;

            match result.status {
                Status::Ok => {
                    return Ok(IncrementOutcome {
                        value: next,
                        version: entry_for(&result, key)?.version,
                        attempts,
                    });
                }
                Status::Abort => {
                    let seen = entry_for(&result, key)?;
                    trace!(key = key.as_u32(), attempts, seen = %seen.version, "Increment conflict");
                    value = seen.value;
                    version = seen.version;
                }
                Status::BadRequest => return Err(rejected(&result)),
            }
        }
    }
}

fn parse_counter(key: Key, value: &Value) -> Result<u64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| Error::NotACounter {
            key,
            value: value.clone(),
        })
}

fn next_counter(key: Key, value: &Value) -> Result<u64> {
    parse_counter(key, value)?
        .checked_add(1)
        .ok_or(Error::CounterOverflow { key })
}

fn entry_for(result: &TxnResult, key: Key) -> Result<ResultOp> {
    result.op(key).cloned().ok_or_else(|| {
        Error::Protocol(format!(
            "{} response to request {} has no entry for key {}",
            result.status, result.request_id, key
        ))
    })
}

fn expect_ok(result: &TxnResult) -> Result<()> {
    match result.status {
        Status::Ok => Ok(()),
        _ => Err(rejected(result)),
    }
}

fn rejected(result: &TxnResult) -> Error {
    Error::Protocol(format!(
        "request {} answered with {}",
        result.request_id, result.status
    ))
}
