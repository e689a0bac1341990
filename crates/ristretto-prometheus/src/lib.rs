//! Prometheus exporter for ristretto-style cache counters
//!
//! Exposes the counters a cache already maintains (hits, misses, added and
//! evicted keys and costs, dropped and rejected sets, ...) as Prometheus
//! samples, computed on every scrape.
//!
//! # Features
//!
//! - **Built-in catalog**: one option per ristretto counter plus the hit ratio gauge
//! - **Custom metrics**: any name/help/kind/extractor, optionally with per-scrape labels
//! - **Consistent scrapes**: one counters handle per scrape, series emitted in registration order
//! - **Disabled metrics**: a cache without counters still produces a full, zero-valued scrape
//!
//! # Example
//!
//! ```
//! use prometheus::Registry;
//! use ristretto_prometheus::{CollectorConfig, CountersSnapshot, MetricsCollector};
//! use std::sync::Arc;
//!
//! let counters = Arc::new(CountersSnapshot { hits: 49, misses: 20, ..Default::default() });
//!
//! let collector = MetricsCollector::with_counters(
//!     counters,
//!     CollectorConfig::new()
//!         .with_namespace("appname")
//!         .with_subsystem("subsystemname")
//!         .with_const_labels([("app_version", "v1.2.3")])
//!         .with_hits_counter_metric()
//!         .with_misses_counter_metric()
//!         .with_hits_ratio_gauge_metric(),
//! )?;
//!
//! let registry = Registry::new();
//! collector.register(&registry)?;
//! assert_eq!(registry.gather().len(), 3);
//! # Ok::<(), ristretto_prometheus::CollectorError>(())
//! ```

pub mod catalog;
pub mod collector;
pub mod config;
pub mod counters;
pub mod descriptor;
pub mod error;

pub use catalog::BuiltinMetric;
pub use collector::MetricsCollector;
pub use config::{build_fq_name, CollectorConfig, CollectorSettings};
pub use counters::{hit_ratio, CacheCounters, CountersSnapshot};
pub use descriptor::{Extractor, LabelValuesExtractor, MetricDesc, ValueKind, VariableLabels};
pub use error::{CollectorError, CollectorResult};

// Re-export prometheus types for convenience
pub use prometheus::{Encoder, Registry, TextEncoder};
