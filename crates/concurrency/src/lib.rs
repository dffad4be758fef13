//! Concurrency layer for the Gotthard store
//!
//! This crate implements optimistic concurrency control (OCC) for one-shot
//! transactions:
//! - validation: precondition evaluation of reads (expected value / version)
//! - manager: atomic commit-or-abort of a whole batch, and result shaping
//!
//! Serializability comes from the caller: `TransactionManager::execute`
//! must run with exclusive access to the store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod validation;

pub use manager::{check_request, ManagerStats, Rejection, TransactionManager};
pub use validation::{evaluate, validate_reads, Evaluation, ReadConflict, ValidationResult};
