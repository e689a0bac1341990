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
//! Built-in metric catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::counters::CacheCounters;
use crate::descriptor::{MetricDesc, ValueKind};
use crate::error::CollectorError;

/// Metrics every ristretto-style cache can export
///
/// Deserialization goes through [`FromStr`], so settings files accept the
/// same spellings as `str::parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum BuiltinMetric {
    /// Get calls that found a value
    Hits,
    /// Get calls that found nothing
    Misses,
    /// Keys added
    KeysAdded,
    /// Sum of added costs
    CostAdded,
    /// Keys evicted
    KeysEvicted,
    /// Sum of evicted costs
    CostEvicted,
    /// Set calls dropped before buffering
    SetsDropped,
    /// Set calls rejected by the policy
    SetsRejected,
    /// Dropped Get counter increments
    GetsDropped,
    /// Kept Get counter increments
    GetsKept,
    /// Share of Get calls that hit
    HitsRatio,
}

impl BuiltinMetric {
    /// Every built-in, in catalog order
    pub const ALL: [BuiltinMetric; 11] = [
        BuiltinMetric::Hits,
        BuiltinMetric::Misses,
        BuiltinMetric::KeysAdded,
        BuiltinMetric::CostAdded,
        BuiltinMetric::KeysEvicted,
        BuiltinMetric::CostEvicted,
        BuiltinMetric::SetsDropped,
        BuiltinMetric::SetsRejected,
        BuiltinMetric::GetsDropped,
        BuiltinMetric::GetsKept,
        BuiltinMetric::HitsRatio,
    ];

    /// Well-known registration key
    pub fn key(&self) -> &'static str {
        match self {
            BuiltinMetric::Hits => "hits",
            BuiltinMetric::Misses => "misses",
            BuiltinMetric::KeysAdded => "keys_added",
            BuiltinMetric::CostAdded => "cost_added",
            BuiltinMetric::KeysEvicted => "keys_evicted",
            BuiltinMetric::CostEvicted => "cost_evicted",
            BuiltinMetric::SetsDropped => "sets_dropped",
            BuiltinMetric::SetsRejected => "sets_rejected",
            BuiltinMetric::GetsDropped => "gets_dropped",
            BuiltinMetric::GetsKept => "gets_kept",
            BuiltinMetric::HitsRatio => "hits_ratio",
        }
    }

    /// All registration keys, in catalog order
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(BuiltinMetric::key).collect()
    }

    /// Exported metric name before namespace and subsystem prefixing
    pub fn metric_name(&self) -> &'static str {
        match self {
            BuiltinMetric::Hits => "ristretto_hits_total",
            BuiltinMetric::Misses => "ristretto_misses_total",
            BuiltinMetric::KeysAdded => "ristretto_keys_added_total",
            BuiltinMetric::CostAdded => "ristretto_cost_added_total",
            BuiltinMetric::KeysEvicted => "ristretto_keys_evicted_total",
            BuiltinMetric::CostEvicted => "ristretto_cost_evicted_total",
            BuiltinMetric::SetsDropped => "ristretto_sets_dropped_total",
            BuiltinMetric::SetsRejected => "ristretto_sets_rejected_total",
            BuiltinMetric::GetsDropped => "ristretto_gets_dropped_total",
            BuiltinMetric::GetsKept => "ristretto_gets_kept_total",
            BuiltinMetric::HitsRatio => "ristretto_hits_ratio",
        }
    }

    /// Help text
    pub fn help(&self) -> &'static str {
        match self {
            BuiltinMetric::Hits => {
                "The number of Get calls where a value was found for the corresponding key."
            }
            BuiltinMetric::Misses => {
                "The number of Get calls where a value was not found for the corresponding key."
            }
            BuiltinMetric::KeysAdded => "The number of added keys in the cache.",
            BuiltinMetric::CostAdded => "The sum of costs that have been added.",
            BuiltinMetric::KeysEvicted => "The number of evicted keys from the cache.",
            BuiltinMetric::CostEvicted => "The sum of all costs that have been evicted.",
            BuiltinMetric::SetsDropped => {
                "The number of Set calls that don't make it into internal buffers."
            }
            BuiltinMetric::SetsRejected => "The number of Set calls rejected by the policy.",
            BuiltinMetric::GetsDropped => "The number of dropped Get counter increments.",
            BuiltinMetric::GetsKept => "The number of kept Get counter increments.",
            BuiltinMetric::HitsRatio => "The percentage of successful Get calls (hits).",
        }
    }

    /// Value kind
    pub fn value_kind(&self) -> ValueKind {
        match self {
            BuiltinMetric::HitsRatio => ValueKind::Gauge,
            _ => ValueKind::Counter,
        }
    }

    /// Read this metric from the counters, `0.0` when there are none
    pub fn extract(&self, counters: Option<&dyn CacheCounters>) -> f64 {
        let Some(c) = counters else {
            return 0.0;
        };
        let raw = match self {
            BuiltinMetric::Hits => c.hits(),
            BuiltinMetric::Misses => c.misses(),
            BuiltinMetric::KeysAdded => c.keys_added(),
            BuiltinMetric::CostAdded => c.cost_added(),
            BuiltinMetric::KeysEvicted => c.keys_evicted(),
            BuiltinMetric::CostEvicted => c.cost_evicted(),
            BuiltinMetric::SetsDropped => c.sets_dropped(),
            BuiltinMetric::SetsRejected => c.sets_rejected(),
            BuiltinMetric::GetsDropped => c.gets_dropped(),
            BuiltinMetric::GetsKept => c.gets_kept(),
            BuiltinMetric::HitsRatio => return c.ratio(),
        };
        raw as f64
    }

    /// Catalog descriptor for this metric
    pub fn descriptor(&self) -> MetricDesc {
        let metric = *self;
        MetricDesc::new(
            self.metric_name(),
            self.help(),
            self.value_kind(),
            move |counters| metric.extract(counters),
        )
    }
}

impl fmt::Display for BuiltinMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BuiltinMetric {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|metric| metric.key() == key)
            .ok_or_else(|| CollectorError::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for BuiltinMetric {
    type Error = CollectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
