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
//! Cache counter sources
//!
//! The collector never owns or mutates cache counters. It reads them through
//! [`CacheCounters`], which the cache implements over its own atomics.

use serde::{Deserialize, Serialize};

/// Read access to the counters maintained by a cache
///
/// Every reading must be cheap, non-blocking and individually consistent.
/// The collector takes one handle per scrape and reads each field once.
pub trait CacheCounters: Send + Sync {
    /// Get calls where a value was found
    fn hits(&self) -> u64;

    /// Get calls where no value was found
    fn misses(&self) -> u64;

    /// Keys added to the cache
    fn keys_added(&self) -> u64;

    /// Sum of costs of added keys
    fn cost_added(&self) -> u64;

    /// Keys evicted from the cache
    fn keys_evicted(&self) -> u64;

    /// Sum of costs of evicted keys
    fn cost_evicted(&self) -> u64;

    /// Set calls dropped before reaching the internal buffers
    fn sets_dropped(&self) -> u64;

    /// Set calls rejected by the admission policy
    fn sets_rejected(&self) -> u64;

    /// Get counter increments dropped internally
    fn gets_dropped(&self) -> u64;

    /// Get counter increments kept
    fn gets_kept(&self) -> u64;

    /// Ratio of hits to all Get calls
    ///
    /// Returns `0.0` when no Get call has been recorded yet.
    fn ratio(&self) -> f64 {
        hit_ratio(self.hits(), self.misses())
    }
}

/// `hits / (hits + misses)`, or `0.0` for an empty denominator
pub fn hit_ratio(hits: u64, misses: u64) -> f64 {
    // f64 sum, a u64 sum would clamp near the top of the range
    let total = hits as f64 + misses as f64;
    if total == 0.0 {
        0.0
    } else {
        hits as f64 / total
    }
}

/// A frozen reading of every cache counter
///
/// Useful for exporting counters that were captured elsewhere, and as a
/// cheap [`CacheCounters`] implementation in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountersSnapshot {
    /// Get calls where a value was found
    pub hits: u64,
    /// Get calls where no value was found
    pub misses: u64,
    /// Keys added to the cache
    pub keys_added: u64,
    /// Sum of costs of added keys
    pub cost_added: u64,
    /// Keys evicted from the cache
    pub keys_evicted: u64,
    /// Sum of costs of evicted keys
    pub cost_evicted: u64,
    /// Set calls dropped before reaching the internal buffers
    pub sets_dropped: u64,
    /// Set calls rejected by the admission policy
    pub sets_rejected: u64,
    /// Get counter increments dropped internally
    pub gets_dropped: u64,
    /// Get counter increments kept
    pub gets_kept: u64,
}

impl CountersSnapshot {
    /// Create a snapshot with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every counter of `counters` once
    pub fn capture(counters: &dyn CacheCounters) -> Self {
        Self {
            hits: counters.hits(),
            misses: counters.misses(),
            keys_added: counters.keys_added(),
            cost_added: counters.cost_added(),
            keys_evicted: counters.keys_evicted(),
            cost_evicted: counters.cost_evicted(),
            sets_dropped: counters.sets_dropped(),
            sets_rejected: counters.sets_rejected(),
            gets_dropped: counters.gets_dropped(),
            gets_kept: counters.gets_kept(),
        }
    }
}

impl CacheCounters for CountersSnapshot {
    fn hits(&self) -> u64 {
        self.hits
    }

    fn misses(&self) -> u64 {
        self.misses
    }

    fn keys_added(&self) -> u64 {
        self.keys_added
    }

    fn cost_added(&self) -> u64 {
        self.cost_added
    }

    fn keys_evicted(&self) -> u64 {
        self.keys_evicted
    }

    fn cost_evicted(&self) -> u64 {
        self.cost_evicted
    }

    fn sets_dropped(&self) -> u64 {
        self.sets_dropped
    }

    fn sets_rejected(&self) -> u64 {
        self.sets_rejected
    }

    fn gets_dropped(&self) -> u64 {
        self.gets_dropped
    }

    fn gets_kept(&self) -> u64 {
        self.gets_kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let snapshot = CountersSnapshot::new();
        assert_eq!(snapshot.hits(), 0);
        assert_eq!(snapshot.misses(), 0);
        assert_eq!(snapshot.ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        assert_eq!(hit_ratio(0, 0), 0.0);
        assert_eq!(hit_ratio(80, 20), 0.8);
        assert_eq!(hit_ratio(0, 5), 0.0);
        assert_eq!(hit_ratio(5, 0), 1.0);
        assert_eq!(hit_ratio(49, 20), 49.0 / 69.0);
    }

    #[test]
    fn test_hit_ratio_large_counters() {
        assert_eq!(hit_ratio(u64::MAX, u64::MAX), 0.5);
        assert_eq!(hit_ratio(u64::MAX, 0), 1.0);
        assert_eq!(hit_ratio(0, u64::MAX), 0.0);
    }

    #[test]
    fn test_ratio_can_be_overridden() {
        struct Fixed;
        impl CacheCounters for Fixed {
            fn hits(&self) -> u64 {
                1
            }
            fn misses(&self) -> u64 {
                1
            }
            fn keys_added(&self) -> u64 {
                0
            }
            fn cost_added(&self) -> u64 {
                0
            }
            fn keys_evicted(&self) -> u64 {
                0
            }
            fn cost_evicted(&self) -> u64 {
                0
            }
            fn sets_dropped(&self) -> u64 {
                0
            }
            fn sets_rejected(&self) -> u64 {
                0
            }
            fn gets_dropped(&self) -> u64 {
                0
            }
            fn gets_kept(&self) -> u64 {
                0
            }
            fn ratio(&self) -> f64 {
                0.25
            }
        }

        assert_eq!(Fixed.ratio(), 0.25);
        assert_eq!(CountersSnapshot::capture(&Fixed).ratio(), 0.5);
    }

    #[test]
    fn test_capture() {
        let source = CountersSnapshot {
            hits: 3,
            misses: 1,
            keys_added: 7,
            cost_added: 70,
            gets_kept: 4,
            ..Default::default()
        };

        let captured = CountersSnapshot::capture(&source);
        assert_eq!(captured, source);
        assert_eq!(captured.ratio(), 0.75);
    }

    #[test]
    fn test_snapshot_deserializes_partial() {
        let snapshot: CountersSnapshot =
            serde_json::from_str(r#"{"hits": 49, "misses": 20}"#).unwrap();
        assert_eq!(snapshot.hits, 49);
        assert_eq!(snapshot.misses, 20);
        assert_eq!(snapshot.keys_added, 0);
    }
}
