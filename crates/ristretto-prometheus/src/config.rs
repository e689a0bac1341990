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
//! Collector configuration
//!
//! [`CollectorConfig`] is assembled from chained `with_*` options and frozen
//! when the collector is built. Options are applied in call order:
//!
//! - naming options (`with_namespace`, `with_subsystem`) are last-write-wins;
//! - `with_const_labels` merges, later values win per label;
//! - metric options register a descriptor under a key, and registering an
//!   existing key replaces the descriptor in place.
//!
//! [`CollectorSettings`] is the declarative form for applications that keep
//! their metrics setup in a configuration file.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::catalog::BuiltinMetric;
use crate::descriptor::MetricDesc;

/// Naming, labeling and metric selection for a [`MetricsCollector`](crate::MetricsCollector)
#[derive(Debug, Clone, Default)]
pub struct CollectorConfig {
    namespace: String,
    subsystem: String,
    const_labels: BTreeMap<String, String>,
    metrics: Vec<(String, MetricDesc)>,
}

impl CollectorConfig {
    /// Create an empty configuration that exports nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace prepended to every metric name
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the subsystem placed between the namespace and the metric name
    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    /// Merge labels attached to every sample of the collector
    pub fn with_const_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.const_labels
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Register `desc` under `key`, replacing any descriptor already there
    pub fn with_metric(mut self, key: impl Into<String>, desc: MetricDesc) -> Self {
        let key = key.into();
        match self.metrics.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = desc,
            None => self.metrics.push((key, desc)),
        }
        self
    }

    /// Register a catalog metric under its well-known key
    pub fn with_builtin(self, metric: BuiltinMetric) -> Self {
        self.with_metric(metric.key(), metric.descriptor())
    }

    /// Register every catalog metric
    pub fn with_all_builtins(self) -> Self {
        BuiltinMetric::ALL
            .into_iter()
            .fold(self, CollectorConfig::with_builtin)
    }

    /// Export `ristretto_hits_total`
    pub fn with_hits_counter_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::Hits)
    }

    /// Export `ristretto_misses_total`
    pub fn with_misses_counter_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::Misses)
    }

    /// Export `ristretto_keys_added_total`
    pub fn with_keys_added_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::KeysAdded)
    }

    /// Export `ristretto_cost_added_total`
    pub fn with_cost_added_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::CostAdded)
    }

    /// Export `ristretto_keys_evicted_total`
    pub fn with_keys_evicted_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::KeysEvicted)
    }

    /// Export `ristretto_cost_evicted_total`
    pub fn with_cost_evicted_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::CostEvicted)
    }

    /// Export `ristretto_sets_dropped_total`
    pub fn with_sets_dropped_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::SetsDropped)
    }

    /// Export `ristretto_sets_rejected_total`
    pub fn with_sets_rejected_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::SetsRejected)
    }

    /// Export `ristretto_gets_dropped_total`
    pub fn with_gets_dropped_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::GetsDropped)
    }

    /// Export `ristretto_gets_kept_total`
    pub fn with_gets_kept_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::GetsKept)
    }

    /// Export the `ristretto_hits_ratio` gauge
    pub fn with_hits_ratio_gauge_metric(self) -> Self {
        self.with_builtin(BuiltinMetric::HitsRatio)
    }

    /// Namespace, empty when unset
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Subsystem, empty when unset
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Constant labels, sorted by name
    pub fn const_labels(&self) -> &BTreeMap<String, String> {
        &self.const_labels
    }

    /// Registered descriptors in registration order
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &MetricDesc)> {
        self.metrics.iter().map(|(key, desc)| (key.as_str(), desc))
    }

    /// Descriptor registered under `key`
    pub fn metric(&self, key: &str) -> Option<&MetricDesc> {
        self.metrics
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, desc)| desc)
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no descriptor is registered
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Fully-qualified exported name for a metric name
    pub fn fq_name(&self, name: &str) -> String {
        build_fq_name(&self.namespace, &self.subsystem, name)
    }

    pub(crate) fn const_labels_map(&self) -> HashMap<String, String> {
        self.const_labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Split off the registered descriptors, keeping naming and labels
    pub(crate) fn into_parts(mut self) -> (Self, Vec<(String, MetricDesc)>) {
        let metrics = std::mem::take(&mut self.metrics);
        (self, metrics)
    }
}

/// Join the non-empty segments with `_`
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Declarative collector configuration
///
/// # Example
///
/// ```
/// use ristretto_prometheus::{BuiltinMetric, CollectorSettings};
///
/// let settings: CollectorSettings = serde_json::from_str(
///     r#"{"namespace": "app", "metrics": ["hits", "misses", "hits_ratio"]}"#,
/// ).unwrap();
///
/// assert_eq!(settings.metrics[2], BuiltinMetric::HitsRatio);
/// assert_eq!(settings.into_config().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorSettings {
    /// Namespace prepended to every metric name
    pub namespace: String,

    /// Subsystem placed between namespace and metric name
    pub subsystem: String,

    /// Labels attached to every sample
    pub const_labels: BTreeMap<String, String>,

    /// Built-in metrics to export, in emission order
    pub metrics: Vec<BuiltinMetric>,
}

impl CollectorSettings {
    /// Settings exporting every built-in metric
    pub fn all_builtins() -> Self {
        Self {
            metrics: BuiltinMetric::ALL.to_vec(),
            ..Default::default()
        }
    }

    /// Convert into a builder configuration
    pub fn into_config(self) -> CollectorConfig {
        self.metrics.into_iter().fold(
            CollectorConfig::new()
                .with_namespace(self.namespace)
                .with_subsystem(self.subsystem)
                .with_const_labels(self.const_labels),
            CollectorConfig::with_builtin,
        )
    }
}

impl From<CollectorSettings> for CollectorConfig {
    fn from(settings: CollectorSettings) -> Self {
        settings.into_config()
    }
}
