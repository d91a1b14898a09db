//! Fixed-capacity LRU cache for forward-model evaluations.
//!
//! Finite-difference derivative estimation re-probes the same trial point
//! several times per optimizer iteration, so a handful of retained
//! evaluations absorbs most repeat work.
//!
//! Keys are the exact bit patterns of the four resolved exchange parameters:
//! a hit requires bit-identical inputs, matching the determinism contract of
//! the forward model. Each profile owns its cache; eviction assumes a single
//! writer.

/// Retained evaluations per profile, sized to typical optimizer re-probing.
pub const DEFAULT_CACHE_CAPACITY: usize = 5;

/// Cache key: bit patterns of `(pb, kex_ab, dw_i_ab, dw_s_ab)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalKey([u64; 4]);

impl EvalKey {
    pub fn new(values: [f64; 4]) -> Self {
        EvalKey(values.map(f64::to_bits))
    }
}

/// Least-recently-used map with a small fixed capacity.
///
/// Backed by a plain vector ordered oldest-first; at the capacities used
/// here a linear scan beats any hashed structure.
#[derive(Debug, Clone)]
pub struct EvalCache {
    capacity: usize,
    entries: Vec<(EvalKey, Vec<f64>)>,
}

impl EvalCache {
    pub fn new(capacity: usize) -> Self {
        EvalCache {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &EvalKey) -> Option<Vec<f64>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1.clone();
        self.entries.push(entry);
        Some(value)
    }

    /// Insert a value, evicting the least-recently-used entry at capacity.
    pub fn insert(&mut self, key: EvalKey, value: Vec<f64>) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        }
        self.entries.push((key, value));
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
    }
}
