//! Stored entry: the value and version held under one key

use gotthard_core::{Value, Version};

/// Value and version of one key
///
/// A key that has never been written is equivalent to
/// [`StoredEntry::empty`]: the empty value at version 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Logical content
    pub value: Value,
    /// Number of committed writes to this key
    pub version: Version,
}

impl StoredEntry {
    /// The implicit entry of an unwritten key
    pub const fn empty() -> Self {
        StoredEntry {
            value: Value::empty(),
            version: Version::ZERO,
        }
    }

    /// Create an entry
    pub fn new(value: Value, version: Version) -> Self {
        StoredEntry { value, version }
    }

    /// True if this entry was never written (version 0)
    #[inline]
    pub fn is_unwritten(&self) -> bool {
        self.version == Version::ZERO
    }
}

impl Default for StoredEntry {
    fn default() -> Self {
        Self::empty()
    }
}
