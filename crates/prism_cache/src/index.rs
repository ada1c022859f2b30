//! In-memory cache index.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use prism_common::ShaderKind;

use crate::key::{CacheKey, CacheLocation};

/// Maps cache keys to blob ranges.
///
/// Authoritative while the cache is open. Entries are never replaced or
/// removed; the first insertion for a key wins.
#[derive(Debug, Default, Clone)]
pub struct CacheIndex {
    entries: HashMap<CacheKey, CacheLocation>,
}

impl CacheIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the blob range stored for `key`.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheLocation> {
        self.entries.get(key).copied()
    }

    /// Records a blob range for `key`.
    ///
    /// Returns `false` and keeps the existing range if the key is already
    /// present. Persisting the matching record is the caller's job.
    pub fn insert(&mut self, key: CacheKey, location: CacheLocation) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(location);
                true
            }
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &CacheLocation)> {
        self.entries.iter()
    }

    /// Number of entries compiled for `kind`.
    pub fn count_kind(&self, kind: ShaderKind) -> usize {
        self.entries.keys().filter(|k| k.kind == kind).count()
    }

    /// Total bytecode bytes referenced by the index.
    pub fn referenced_bytes(&self) -> u64 {
        self.entries.values().map(|loc| u64::from(loc.size)).sum()
    }
}
