// Copyright (C) 2026  ristretto-prometheus Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! A small cost-bounded cache with ristretto-style counters.
//!
//! Writes are applied synchronously, so [`TestCache::wait`] returns at once.
//! Eviction removes the oldest inserted key until the new entry fits.

use ristretto_prometheus::CacheCounters;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Atomic counters updated by [`TestCache`].
#[derive(Debug, Default)]
pub struct TestCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    keys_added: AtomicU64,
    cost_added: AtomicU64,
    keys_evicted: AtomicU64,
    cost_evicted: AtomicU64,
    sets_dropped: AtomicU64,
    sets_rejected: AtomicU64,
    gets_dropped: AtomicU64,
    gets_kept: AtomicU64,
}

impl TestCounters {
    fn add(counter: &AtomicU64, delta: u64) {
        counter.fetch_add(delta, Ordering::Relaxed);
    }

    /// Record a dropped Set call.
    pub fn record_set_dropped(&self) {
        Self::add(&self.sets_dropped, 1);
    }

    /// Record a dropped Get counter increment.
    pub fn record_get_dropped(&self) {
        Self::add(&self.gets_dropped, 1);
    }
}

impl CacheCounters for TestCounters {
    fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn keys_added(&self) -> u64 {
        self.keys_added.load(Ordering::Relaxed)
    }

    fn cost_added(&self) -> u64 {
        self.cost_added.load(Ordering::Relaxed)
    }

    fn keys_evicted(&self) -> u64 {
        self.keys_evicted.load(Ordering::Relaxed)
    }

    fn cost_evicted(&self) -> u64 {
        self.cost_evicted.load(Ordering::Relaxed)
    }

    fn sets_dropped(&self) -> u64 {
        self.sets_dropped.load(Ordering::Relaxed)
    }

    fn sets_rejected(&self) -> u64 {
        self.sets_rejected.load(Ordering::Relaxed)
    }

    fn gets_dropped(&self) -> u64 {
        self.gets_dropped.load(Ordering::Relaxed)
    }

    fn gets_kept(&self) -> u64 {
        self.gets_kept.load(Ordering::Relaxed)
    }
}

struct Store<K, V> {
    entries: HashMap<K, (V, u64)>,
    order: VecDeque<K>,
    used: u64,
}

/// Thread-safe cache used to drive collectors in tests.
pub struct TestCache<K, V> {
    store: Mutex<Store<K, V>>,
    max_cost: u64,
    counters: Option<Arc<TestCounters>>,
}

impl<K, V> TestCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache with counters enabled.
    pub fn new(max_cost: u64) -> Self {
        Self::build(max_cost, true)
    }

    /// Create a cache that keeps no counters.
    pub fn without_metrics(max_cost: u64) -> Self {
        Self::build(max_cost, false)
    }

    fn build(max_cost: u64, metrics: bool) -> Self {
        Self {
            store: Mutex::new(Store {
                entries: HashMap::new(),
                order: VecDeque::new(),
                used: 0,
            }),
            max_cost,
            counters: metrics.then(|| Arc::new(TestCounters::default())),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store<K, V>> {
        // A panicking test thread must not hide the store from the others
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, f: impl FnOnce(&TestCounters)) {
        if let Some(counters) = &self.counters {
            f(counters);
        }
    }

    /// Counters handle to hand to a collector, `None` when metrics are off.
    pub fn metrics(&self) -> Option<Arc<dyn CacheCounters>> {
        self.counters
            .as_ref()
            .map(|c| Arc::clone(c) as Arc<dyn CacheCounters>)
    }

    /// Concrete counters, for tests that record drops by hand.
    pub fn counters(&self) -> Option<&TestCounters> {
        self.counters.as_deref()
    }

    /// Insert or update `key`. Returns `false` when the entry can never fit.
    pub fn set(&self, key: K, value: V, cost: u64) -> bool {
        if cost > self.max_cost {
            self.record(|c| TestCounters::add(&c.sets_rejected, 1));
            return false;
        }

        let mut store = self.store();
        if let Some((_, old_cost)) = store.entries.remove(&key) {
            store.used -= old_cost;
            store.order.retain(|k| k != &key);
        } else {
            self.record(|c| TestCounters::add(&c.keys_added, 1));
        }
        self.record(|c| TestCounters::add(&c.cost_added, cost));

        while store.used + cost > self.max_cost {
            let Some(oldest) = store.order.pop_front() else {
                break;
            };
            if let Some((_, evicted_cost)) = store.entries.remove(&oldest) {
                store.used -= evicted_cost;
                self.record(|c| {
                    TestCounters::add(&c.keys_evicted, 1);
                    TestCounters::add(&c.cost_evicted, evicted_cost);
                });
            }
        }

        store.used += cost;
        store.order.push_back(key.clone());
        store.entries.insert(key, (value, cost));
        true
    }

    /// Look up `key`, counting a hit or a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.store().entries.get(key).map(|(v, _)| v.clone());
        let hit = value.is_some();
        self.record(|c| {
            TestCounters::add(&c.gets_kept, 1);
            if hit {
                TestCounters::add(&c.hits, 1);
            } else {
                TestCounters::add(&c.misses, 1);
            }
        });
        value
    }

    /// Wait for buffered writes. Writes are synchronous here.
    pub fn wait(&self) {}

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let cache = TestCache::new(100);
        assert!(cache.set("a", 1, 1));
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);

        let counters = cache.counters().unwrap();
        assert_eq!(counters.hits(), 1);
        assert_eq!(counters.misses(), 1);
        assert_eq!(counters.keys_added(), 1);
        assert_eq!(counters.gets_kept(), 2);
    }

    #[test]
    fn test_eviction_counts_cost() {
        let cache = TestCache::new(2);
        cache.set("a", 1, 1);
        cache.set("b", 2, 1);
        cache.set("c", 3, 2);

        let counters = cache.counters().unwrap();
        assert_eq!(counters.keys_evicted(), 2);
        assert_eq!(counters.cost_evicted(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rejected_set() {
        let cache = TestCache::new(1);
        assert!(!cache.set("big", 1, 5));
        assert_eq!(cache.counters().unwrap().sets_rejected(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_without_metrics() {
        let cache = TestCache::without_metrics(10);
        cache.set("a", 1, 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert!(cache.metrics().is_none());
    }
}
