//! Route resolution caching.
//!
//! [`RouteCache`] memoizes the outcome of matching a base-stripped path
//! against the route table, including "no route matched". It is gated
//! behind the `cache` feature flag and uses the [`lru`] crate internally.
//!
//! The router clears the cache whenever routes are added, so a cached entry
//! is always what a fresh table walk would return.
//!
//! # Examples
//!
//! ```
//! use page_navigator::cache::RouteCache;
//!
//! let mut cache = RouteCache::new();
//! assert!(cache.get("/about").is_none());
//! cache.insert("/about".to_string(), None);
//!
//! assert_eq!(cache.get("/about"), Some(None));
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::route::RouteMatch;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to walk the route table.
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of path → resolution outcome.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Option<RouteMatch>>,
    stats: CacheStats,
}

impl RouteCache {
    /// Default number of cached paths.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(NonZeroUsize::new(Self::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }

    /// Create a cache holding at most `capacity` paths.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} invalidations, hit rate {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up a path. `Some(None)` is a cached "no route matched".
    pub fn get(&mut self, path: &str) -> Option<Option<RouteMatch>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for '{}'", path);
            None
        }
    }

    /// Record the resolution outcome of a path.
    pub fn insert(&mut self, path: String, outcome: Option<RouteMatch>) {
        self.entries.push(path, outcome);
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}
