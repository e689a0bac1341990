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
//! Prometheus collector for cache counters
//!
//! Provides a custom Prometheus collector that turns the counters of a cache
//! into one sample per registered descriptor on every scrape.

use prometheus::core::{Collector, Desc, Describer};
use prometheus::proto::MetricFamily;
use prometheus::{Counter, CounterVec, Gauge, GaugeVec, Opts, Registry};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::CollectorConfig;
use crate::counters::{CacheCounters, CountersSnapshot};
use crate::descriptor::{MetricDesc, ValueKind};
use crate::error::{CollectorError, CollectorResult};

/// Custom Prometheus collector for a cache's counters
///
/// The configuration is frozen at construction, so concurrent scrapes of the
/// same collector need no locking. Cloning is cheap and yields a handle to the
/// same collector.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<CollectorInner>,
}

struct CollectorInner {
    /// `None` when the cache runs without metrics
    counters: Option<Arc<dyn CacheCounters>>,
    entries: Vec<Entry>,
}

/// One registered descriptor with its prebuilt Prometheus identity
struct Entry {
    key: String,
    metric: MetricDesc,
    opts: Opts,
    desc: Desc,
}

impl Entry {
    fn new(key: String, metric: MetricDesc, config: &CollectorConfig) -> CollectorResult<Self> {
        let opts = Opts::new(metric.name(), metric.help())
            .namespace(config.namespace())
            .subsystem(config.subsystem())
            .const_labels(config.const_labels_map())
            .variable_labels(metric.variable_label_names().to_vec());

        let desc = opts
            .describe()
            .map_err(|e| CollectorError::invalid_descriptor(opts.fq_name(), e))?;

        Ok(Self {
            key,
            metric,
            opts,
            desc,
        })
    }

    fn fq_name(&self) -> &str {
        &self.desc.fq_name
    }

    /// Build the metric family for one scrape
    fn sample(&self, counters: Option<&dyn CacheCounters>) -> prometheus::Result<Vec<MetricFamily>> {
        let value = self.metric.extract(counters);

        let Some(labels) = self.metric.variable_labels() else {
            return match self.metric.value_kind() {
                ValueKind::Counter => {
                    let counter = Counter::with_opts(self.opts.clone())?;
                    counter.inc_by(value);
                    Ok(counter.collect())
                }
                ValueKind::Gauge => {
                    let gauge = Gauge::with_opts(self.opts.clone())?;
                    gauge.set(value);
                    Ok(gauge.collect())
                }
            };
        };

        let names: Vec<&str> = labels.names().iter().map(String::as_str).collect();
        let values = labels.values(counters);
        let values: Vec<&str> = values.iter().map(String::as_str).collect();

        match self.metric.value_kind() {
            ValueKind::Counter => {
                let vec = CounterVec::new(self.opts.clone(), &names)?;
                vec.get_metric_with_label_values(&values)?.inc_by(value);
                Ok(vec.collect())
            }
            ValueKind::Gauge => {
                let vec = GaugeVec::new(self.opts.clone(), &names)?;
                vec.get_metric_with_label_values(&values)?.set(value);
                Ok(vec.collect())
            }
        }
    }
}

impl MetricsCollector {
    /// Create a collector over `counters` using `config`
    ///
    /// Pass `None` when the cache was built without metrics; every scrape
    /// then reports zero values. Invalid metric or label names are rejected
    /// here, duplicate names are rejected by [`register`](Self::register).
    pub fn new(
        counters: Option<Arc<dyn CacheCounters>>,
        config: CollectorConfig,
    ) -> CollectorResult<Self> {
        let (config, metrics) = config.into_parts();
        let entries = metrics
            .into_iter()
            .map(|(key, metric)| Entry::new(key, metric, &config))
            .collect::<CollectorResult<Vec<_>>>()?;

        debug!(
            metrics = entries.len(),
            counters_attached = counters.is_some(),
            "Created cache metrics collector"
        );

        Ok(Self {
            inner: Arc::new(CollectorInner { counters, entries }),
        })
    }

    /// Create a collector over counters that are always present
    pub fn with_counters<C>(counters: Arc<C>, config: CollectorConfig) -> CollectorResult<Self>
    where
        C: CacheCounters + 'static,
    {
        let counters: Arc<dyn CacheCounters> = counters;
        Self::new(Some(counters), config)
    }

    /// Whether the collector reads live counters
    pub fn has_counters(&self) -> bool {
        self.inner.counters.is_some()
    }

    /// Registration keys in emission order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Fully-qualified metric names in emission order
    pub fn fq_names(&self) -> impl Iterator<Item = &str> {
        self.inner.entries.iter().map(Entry::fq_name)
    }

    /// Number of exported series
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether the collector exports nothing
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Check that no two descriptors export the same name
    pub fn validate(&self) -> CollectorResult<()> {
        let mut seen = HashSet::with_capacity(self.len());
        for name in self.fq_names() {
            if !seen.insert(name) {
                return Err(CollectorError::duplicate_metric_name(name));
            }
        }
        Ok(())
    }

    /// Register with `registry`
    ///
    /// Either every descriptor is registered or none is. A collector without
    /// descriptors registers successfully and contributes nothing.
    pub fn register(&self, registry: &Registry) -> CollectorResult<()> {
        if let Err(e) = self.validate() {
            warn!(error = %e, "Rejected cache metrics collector");
            return Err(e);
        }

        if self.is_empty() {
            debug!("Cache metrics collector has no metrics, nothing to register");
            return Ok(());
        }

        registry.register(Box::new(self.clone())).map_err(|e| {
            warn!(error = %e, "Registry refused cache metrics collector");
            CollectorError::from(e)
        })?;

        info!(metrics = self.len(), "Registered cache metrics collector");
        Ok(())
    }

    /// Remove from `registry`
    pub fn unregister(&self, registry: &Registry) -> CollectorResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        registry.unregister(Box::new(self.clone()))?;
        debug!(metrics = self.len(), "Unregistered cache metrics collector");
        Ok(())
    }
}

impl Collector for MetricsCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.inner.entries.iter().map(|entry| &entry.desc).collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // Every series of one scrape reads the same captured values
        let snapshot = self
            .inner
            .counters
            .as_deref()
            .map(CountersSnapshot::capture);
        let counters = snapshot.as_ref().map(|s| s as &dyn CacheCounters);

        let mut families = Vec::with_capacity(self.inner.entries.len());
        for entry in &self.inner.entries {
            match entry.sample(counters) {
                Ok(mut family) => families.append(&mut family),
                Err(e) => warn!(metric = entry.fq_name(), error = %e, "Failed to build sample"),
            }
        }

        debug!(
            families = families.len(),
            counters_attached = counters.is_some(),
            "Collected cache metrics"
        );
        families
    }
}

impl fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("metrics", &self.fq_names().collect::<Vec<_>>())
            .field("counters_attached", &self.has_counters())
            .finish()
    }
}
