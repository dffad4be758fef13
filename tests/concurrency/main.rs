//! Concurrency Integration Tests
//!
//! Many sessions racing on one `Database`, each from its own thread.

#[path = "../common/mod.rs"]
mod common;

mod concurrent_transactions;
mod stress;
