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
//! Metric descriptors
//!
//! A [`MetricDesc`] names one exported series and knows how to compute its
//! value from the cache counters. Descriptors are immutable and cheap to
//! clone; extractors are shared behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::counters::CacheCounters;

/// Computes a sample value from the cache counters
///
/// Receives `None` when the cache has no counters attached and must return
/// the metric's zero value in that case.
pub type Extractor = Arc<dyn Fn(Option<&dyn CacheCounters>) -> f64 + Send + Sync>;

/// Computes the values of a descriptor's variable labels for one scrape
pub type LabelValuesExtractor = Arc<dyn Fn(Option<&dyn CacheCounters>) -> Vec<String> + Send + Sync>;

/// Prometheus value type of an exported series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Monotonically increasing value
    Counter,
    /// Value that can go up and down
    Gauge,
}

impl ValueKind {
    /// Get string label used in the `# TYPE` line
    pub fn as_label(&self) -> &'static str {
        match self {
            ValueKind::Counter => "counter",
            ValueKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Per-scrape labels attached to a single descriptor
#[derive(Clone)]
pub struct VariableLabels {
    names: Vec<String>,
    values: LabelValuesExtractor,
}

impl VariableLabels {
    /// Label names, in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Label values for one scrape, normalized to the declared arity
    ///
    /// Missing values are filled with empty strings and extra values are
    /// dropped, so a misbehaving extractor can never fail a scrape.
    pub fn values(&self, counters: Option<&dyn CacheCounters>) -> Vec<String> {
        let mut values = (self.values)(counters);
        if values.len() != self.names.len() {
            tracing::debug!(
                expected = self.names.len(),
                got = values.len(),
                "Label value count mismatch, normalizing"
            );
            values.resize(self.names.len(), String::new());
        }
        values
    }
}

impl fmt::Debug for VariableLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableLabels")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

/// Description of one exported metric series
#[derive(Clone)]
pub struct MetricDesc {
    name: String,
    help: String,
    value_kind: ValueKind,
    variable_labels: Option<VariableLabels>,
    extractor: Extractor,
}

impl MetricDesc {
    /// Create a descriptor
    ///
    /// `name` is the metric name before namespace and subsystem prefixing.
    pub fn new<F>(
        name: impl Into<String>,
        help: impl Into<String>,
        value_kind: ValueKind,
        extractor: F,
    ) -> Self
    where
        F: Fn(Option<&dyn CacheCounters>) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            help: help.into(),
            value_kind,
            variable_labels: None,
            extractor: Arc::new(extractor),
        }
    }

    /// Create a counter descriptor
    pub fn counter<F>(name: impl Into<String>, help: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(Option<&dyn CacheCounters>) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, help, ValueKind::Counter, extractor)
    }

    /// Create a gauge descriptor
    pub fn gauge<F>(name: impl Into<String>, help: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(Option<&dyn CacheCounters>) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, help, ValueKind::Gauge, extractor)
    }

    /// Attach variable labels whose values are computed on every scrape
    pub fn with_variable_labels<I, S, F>(mut self, names: I, values: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Option<&dyn CacheCounters>) -> Vec<String> + Send + Sync + 'static,
    {
        self.variable_labels = Some(VariableLabels {
            names: names.into_iter().map(Into::into).collect(),
            values: Arc::new(values),
        });
        self
    }

    /// Replace the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Metric name before prefixing
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Value kind
    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Variable labels, if any
    pub fn variable_labels(&self) -> Option<&VariableLabels> {
        self.variable_labels.as_ref()
    }

    /// Names of the variable labels, empty when there are none
    pub fn variable_label_names(&self) -> &[String] {
        self.variable_labels
            .as_ref()
            .map(VariableLabels::names)
            .unwrap_or_default()
    }

    /// Evaluate the extractor
    ///
    /// Non-finite results become `0.0`, and counters never report a value
    /// below zero.
    pub fn extract(&self, counters: Option<&dyn CacheCounters>) -> f64 {
        let value = (self.extractor)(counters);
        if !value.is_finite() {
            return 0.0;
        }
        match self.value_kind {
            ValueKind::Counter => value.max(0.0),
            ValueKind::Gauge => value,
        }
    }
}

impl fmt::Debug for MetricDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricDesc")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("value_kind", &self.value_kind)
            .field("variable_labels", &self.variable_labels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CountersSnapshot;

    #[test]
    fn test_value_kind_labels() {
        assert_eq!(ValueKind::Counter.as_label(), "counter");
        assert_eq!(ValueKind::Gauge.as_label(), "gauge");
        assert_eq!(ValueKind::Gauge.to_string(), "gauge");
    }

    #[test]
    fn test_extract_from_counters() {
        let desc = MetricDesc::counter("my_hits_total", "Hits.", |c| {
            c.map_or(0.0, |c| c.hits() as f64)
        });
        let snapshot = CountersSnapshot {
            hits: 12,
            ..Default::default()
        };

        assert_eq!(desc.extract(Some(&snapshot)), 12.0);
        assert_eq!(desc.extract(None), 0.0);
        assert_eq!(desc.value_kind(), ValueKind::Counter);
    }

    #[test]
    fn test_extract_sanitizes_values() {
        let nan = MetricDesc::gauge("nan", "NaN.", |_| f64::NAN);
        assert_eq!(nan.extract(None), 0.0);

        let inf = MetricDesc::gauge("inf", "Infinity.", |_| f64::INFINITY);
        assert_eq!(inf.extract(None), 0.0);

        let negative_counter = MetricDesc::counter("neg_total", "Negative.", |_| -3.0);
        assert_eq!(negative_counter.extract(None), 0.0);

        let negative_gauge = MetricDesc::gauge("neg", "Negative.", |_| -3.0);
        assert_eq!(negative_gauge.extract(None), -3.0);
    }

    #[test]
    fn test_variable_labels_are_normalized() {
        let desc = MetricDesc::gauge("shard_keys", "Keys per shard.", |_| 1.0)
            .with_variable_labels(["shard", "region"], |_| vec!["0".to_string()]);

        let labels = desc.variable_labels().unwrap();
        assert_eq!(labels.names(), ["shard", "region"]);
        assert_eq!(labels.values(None), vec!["0".to_string(), String::new()]);

        let desc = MetricDesc::gauge("shard_keys", "Keys per shard.", |_| 1.0)
            .with_variable_labels(["shard"], |_| vec!["0".into(), "extra".into()]);
        assert_eq!(desc.variable_labels().unwrap().values(None), vec!["0".to_string()]);
    }

    #[test]
    fn test_with_help_keeps_name() {
        let desc = MetricDesc::counter("hits_total", "Old.", |_| 0.0).with_help("New.");
        assert_eq!(desc.name(), "hits_total");
        assert_eq!(desc.help(), "New.");
        assert!(desc.variable_label_names().is_empty());
    }
}
