//! Conversion-factor cache.
//!
//! One entry per computed pair, keyed on the trimmed `(from, to)` strings.
//! A lookup in the opposite direction is served by the reciprocal, so each
//! entry answers both the forward and the inverse conversion.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uc_core::Real;

/// Outcome of a cache check, as reported by `is_in_cache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CacheHit {
    Miss = 0,
    Forward = 1,
    Inverse = 2,
}

impl CacheHit {
    pub fn code(self) -> u8 {
        self as u8
    }
}

type Key = (String, String);

#[derive(Debug, Default)]
pub struct ConversionCache {
    map: RwLock<HashMap<Key, Real>>,
}

fn key(from: &str, to: &str) -> Key {
    (from.to_string(), to.to_string())
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factor converting `from` into `to`, with the direction it was found in.
    pub fn lookup(&self, from: &str, to: &str) -> Option<(CacheHit, Real)> {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(&factor) = map.get(&key(from, to)) {
            return Some((CacheHit::Forward, factor));
        }
        map.get(&key(to, from))
            .map(|&factor| (CacheHit::Inverse, 1.0 / factor))
    }

    pub fn hit(&self, from: &str, to: &str) -> CacheHit {
        self.lookup(from, to).map_or(CacheHit::Miss, |(hit, _)| hit)
    }

    /// Record `from -> to`. An existing entry for `to -> from` is replaced so
    /// that a pair is stored once.
    pub fn insert(&self, from: &str, to: &str, factor: Real) {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(&key(to, from));
        map.insert(key(from, to), factor);
    }

    /// Remove the pair in both directions. Returns whether anything was removed.
    pub fn remove(&self, from: &str, to: &str) -> bool {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let forward = map.remove(&key(from, to)).is_some();
        let inverse = map.remove(&key(to, from)).is_some();
        forward || inverse
    }

    pub fn clear(&self) {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries, sorted by key.
    pub fn entries(&self) -> Vec<(String, String, Real)> {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<_> = map
            .iter()
            .map(|((from, to), &factor)| (from.clone(), to.clone(), factor))
            .collect();
        out.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        out
    }
}
