//! Concurrent counter increments
//!
//! Every client initializes the shared counter (only the first succeeds)
//! and then increments it `count` times with the CAS loop. With no lost
//! updates the counter ends at `clients * count`.

use std::net::SocketAddr;

use gotthard_core::{ClientId, Key};
use tokio::task::JoinSet;
use tracing::info;

use crate::client::Client;
use crate::error::{Error, Result};

/// What one stress client observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientReport {
    /// Server-assigned id
    pub client_id: ClientId,
    /// Counter value after this client's last increment
    pub last_value: u64,
    /// Increment attempts including conflicts
    pub attempts: u64,
}

/// Run `clients` concurrent connections, each incrementing `key` `count` times
///
/// Reports are returned in completion order.
pub async fn run_increment_clients(
    addr: SocketAddr,
    clients: usize,
    count: u64,
    key: Key,
) -> Result<Vec<ClientReport>> {
    let mut tasks = JoinSet::new();
    for _ in 0..clients {
        tasks.spawn(increment_client(addr, count, key));
    }

    let mut reports = Vec::with_capacity(clients);
    while let Some(joined) = tasks.join_next().await {
        let report = joined.map_err(|e| Error::Protocol(format!("client task failed: {}", e)))??;
        info!(
            client_id = report.client_id.0,
            last_value = report.last_value,
            attempts = report.attempts,
            "Client finished"
        );
        reports.push(report);
    }
    Ok(reports)
}

async fn increment_client(addr: SocketAddr, count: u64, key: Key) -> Result<ClientReport> {
    let mut client = Client::connect(addr).await?;
    client.initialize_counter(key).await?;

    let mut last_value = 0;
    let mut attempts = 0u64;
    for _ in 0..count {
        let outcome = client.increment(key).await?;
        last_value = outcome.value;
        attempts += u64::from(outcome.attempts);
    }

    Ok(ClientReport {
        client_id: client.client_id(),
        last_value,
        attempts,
    })
}
