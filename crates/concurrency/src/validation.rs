//! Precondition evaluation for OCC
//!
//! Every read in a batch may declare what it expects the key to hold: a
//! value, a version, or both. Validation compares those expectations with
//! the store as one snapshot, before any write of the batch is applied.
//!
//! Key rules:
//! - Value comparison is exact over the logical bytes
//! - Both expectations present means both must hold
//! - An unconditioned read always matches
//! - Writes never participate in validation (blind writes do not conflict)

use gotthard_core::{Key, Operation, ReadOp, Value, Version};
use gotthard_storage::{Store, StoredEntry};

/// Outcome of evaluating one read against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation<'a> {
    /// Every expectation holds (or there were none)
    Matched,
    /// At least one expectation failed; carries the authoritative entry
    Mismatched(&'a StoredEntry),
}

impl Evaluation<'_> {
    /// True for `Matched`
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Evaluation::Matched)
    }
}

/// Evaluate one read's preconditions against the key's current entry
///
/// Pure function of its arguments.
pub fn evaluate<'a>(read: &ReadOp, current: &'a StoredEntry) -> Evaluation<'a> {
    let value_ok = read
        .expected_value
        .as_ref()
        .map_or(true, |expected| expected.as_bytes() == current.value.as_bytes());
    let version_ok = read
        .expected_version
        .map_or(true, |expected| expected == current.version);

    if value_ok && version_ok {
        Evaluation::Matched
    } else {
        Evaluation::Mismatched(current)
    }
}

/// A read whose preconditions did not hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadConflict {
    /// Index of the read in the request batch
    pub position: usize,
    /// Key that was read
    pub key: Key,
    /// Value the caller expected, if any
    pub expected_value: Option<Value>,
    /// Version the caller expected, if any
    pub expected_version: Option<Version>,
    /// What the store actually holds
    pub current: StoredEntry,
}

impl ReadConflict {
    /// True if the value expectation was present and failed
    pub fn value_mismatched(&self) -> bool {
        self.expected_value
            .as_ref()
            .is_some_and(|v| v.as_bytes() != self.current.value.as_bytes())
    }

    /// True if the version expectation was present and failed
    pub fn version_mismatched(&self) -> bool {
        self.expected_version
            .is_some_and(|v| v != self.current.version)
    }
}

/// Result of validating a whole batch
///
/// Accumulates every failed read, in request order.
/// A transaction commits only if is_valid() returns true.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All failed reads
    pub conflicts: Vec<ReadConflict>,
}

impl ValidationResult {
    /// A successful validation result (no conflicts)
    pub fn ok() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of failed reads
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate every read of `operations` against `store`
///
/// The store is only borrowed immutably, so all reads observe the same
/// state. Non-read operations are skipped.
pub fn validate_reads(operations: &[Operation], store: &Store) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (position, op) in operations.iter().enumerate() {
        let Operation::Read(read) = op else {
            continue;
        };
        if !read.is_conditional() {
            continue;
        }

        if let Evaluation::Mismatched(current) = evaluate(read, store.get(read.key)) {
            result.conflicts.push(ReadConflict {
                position,
                key: read.key,
                expected_value: read.expected_value.clone(),
                expected_version: read.expected_version,
                current: current.clone(),
            });
        }
    }

    result
}
