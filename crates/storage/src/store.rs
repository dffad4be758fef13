//! In-memory store
//!
//! Maps each key to its [`StoredEntry`]. Keys materialize lazily on first
//! write; reads of unmaterialized keys see the empty entry at version 0.
//!
//! # Design
//!
//! - FxHashMap: O(1) lookups, fast non-crypto hash over `u32` keys
//! - No internal locking: the engine owns the store behind one exclusive
//!   lock so that validate + apply is a single critical section
//! - No deletion primitive: writing the empty value "clears" a key but the
//!   version keeps advancing
//! - Clearing keeps a version floor: every version assigned afterwards is
//!   above every version assigned before, so a stale expected version can
//!   never match a key's later history

use gotthard_core::{Key, Value, Version};
use rustc_hash::FxHashMap;

use crate::stored_value::StoredEntry;

static EMPTY_ENTRY: StoredEntry = StoredEntry::empty();

/// Key to (value, version) mapping
#[derive(Debug, Default)]
pub struct Store {
    entries: FxHashMap<Key, StoredEntry>,
    /// Highest version handed out before the last clear
    floor: Version,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry for `key`
    ///
    /// Never fails: an unwritten key yields the empty entry.
    #[inline]
    pub fn get(&self, key: Key) -> &StoredEntry {
        self.entries.get(&key).unwrap_or(&EMPTY_ENTRY)
    }

    /// Current version of `key`
    #[inline]
    pub fn version(&self, key: Key) -> Version {
        self.get(key).version
    }

    /// Version the next write to `key` gets, or `None` on overflow
    ///
    /// Above both the key's current version and the floor left by the
    /// last clear.
    #[inline]
    pub fn next_version(&self, key: Key) -> Option<Version> {
        self.version(key).max(self.floor).checked_next()
    }

    /// Install entries computed by a commit
    ///
    /// The caller is responsible for having derived each entry's version
    /// with [`Store::next_version`]; this only replaces what is stored. Entries are
    /// installed in iteration order.
    pub fn apply<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Key, StoredEntry)>,
    {
        for (key, entry) in entries {
            debug_assert!(
                entry.version > self.version(key),
                "commit must advance the version of key {}",
                key
            );
            self.entries.insert(key, entry);
        }
    }

    /// Write a single key outside of a transaction, advancing its version
    ///
    /// Returns the new version, or `None` if the version would overflow (in
    /// which case nothing is written).
    pub fn put(&mut self, key: Key, value: Value) -> Option<Version> {
        let version = self.next_version(key)?;
        self.entries.insert(key, StoredEntry::new(value, version));
        Some(version)
    }

    /// Drop every materialized key
    ///
    /// Keys read as empty at version 0 again, but later writes continue
    /// numbering above every version seen so far.
    pub fn clear(&mut self) {
        self.floor = self.high_water();
        self.entries.clear();
    }

    /// An empty store carrying this store's version floor
    ///
    /// What [`Store::clear`] would leave behind, without touching `self`.
    pub fn cleared(&self) -> Store {
        Store {
            entries: FxHashMap::default(),
            floor: self.high_water(),
        }
    }

    fn high_water(&self) -> Version {
        self.entries
            .values()
            .map(|e| e.version)
            .fold(self.floor, Version::max)
    }

    /// Number of materialized keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key has been written
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate materialized keys and their entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Key, &StoredEntry)> {
        self.entries.iter().map(|(k, e)| (*k, e))
    }
}
