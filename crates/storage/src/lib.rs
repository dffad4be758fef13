//! Storage layer for the Gotthard store
//!
//! This crate implements the in-memory backend the engine protects:
//! - Store: FxHashMap-based key to entry mapping with lazy materialization
//! - StoredEntry: value plus per-key version

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;
pub mod stored_value;

pub use store::Store;
pub use stored_value::StoredEntry;
