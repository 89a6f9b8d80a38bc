// src/cache.rs
//! Memoization of pure pricing results
//!
//! The cache is an explicit collaborator owned by the caller (one per
//! session, say) and passed into the `*_cached` entry points. Keys are the
//! exact bit patterns of the inputs, so two calls share an entry only when
//! every argument is bit-identical. When full, the least recently used entry
//! is evicted.

use crate::error::{PricingError, PricingResult};
use std::collections::HashMap;
use tracing::trace;

/// Identity of one pure-function call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    function: &'static str,
    bits: Vec<u64>,
}

impl CacheKey {
    pub fn new(function: &'static str) -> Self {
        CacheKey {
            function,
            bits: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.bits.push(value.to_bits());
        self
    }

    /// Append a slice, length-prefixed so adjacent slices cannot alias
    pub fn with_slice(mut self, values: &[f64]) -> Self {
        self.bits.push(values.len() as u64);
        self.bits.extend(values.iter().map(|v| v.to_bits()));
        self
    }

    pub fn with_tag(mut self, tag: u64) -> Self {
        self.bits.push(tag);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { capacity: 64 }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if self.capacity == 0 {
            return Err(PricingError::invalid_argument(
                "cache capacity",
                "0",
                "at least one entry",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Returns 0.0 if no lookups have occurred.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_used: u64,
}

/// Bounded LRU memo table
#[derive(Debug)]
pub struct PricingCache<V> {
    capacity: usize,
    entries: HashMap<CacheKey, Entry<V>>,
    clock: u64,
    stats: CacheStats,
}

impl<V: Clone> PricingCache<V> {
    pub fn new(config: CacheConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(PricingCache {
            capacity: config.capacity,
            entries: HashMap::with_capacity(config.capacity),
            clock: 0,
            stats: CacheStats::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        self.clock += 1;
        let clock = self.clock;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = clock;
                self.stats.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, value: V) {
        self.clock += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                last_used: self.clock,
            },
        );
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    /// Errors are returned to the caller and never cached.
    pub fn get_or_try_insert_with<F>(&mut self, key: CacheKey, compute: F) -> PricingResult<V>
    where
        F: FnOnce() -> PricingResult<V>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn evict_lru(&mut self) {
        let lru = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru {
            trace!(function = key.function, "evicting cache entry");
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}
