//! Transaction engine for Gotthard
//!
//! This crate ties the lower layers together:
//! - Database: the shared store behind one lock, plus configuration
//! - Session: per-client request numbering and the CAS retry loop
//!
//! The engine is the only component that owns the store. Everything above
//! it (the network server, embedded callers) goes through `Database::execute`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod session;

pub use database::{Database, EngineConfig, EngineStats, RetryConfig, CONFIG_FILE_NAME};
pub use session::{CasOutcome, Session};
