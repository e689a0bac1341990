//! Property-Based Tests for the collector
//!
//! Uses proptest to verify scrape properties over arbitrary counter states:
//! - Hit ratio is finite and within [0, 1]
//! - Every built-in is emitted exactly once
//! - Fully-qualified names never carry stray separators

use proptest::prelude::*;
use ristretto_prometheus::{
    build_fq_name, BuiltinMetric, CollectorConfig, CountersSnapshot, MetricsCollector,
};
use ristretto_prometheus_test_utils::{sample_value, scrape};
use std::sync::Arc;

/// Generate arbitrary counter states
fn arb_snapshot() -> impl Strategy<Value = CountersSnapshot> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<u32>()).prop_map(
        |(hits, misses, keys_added, keys_evicted)| CountersSnapshot {
            hits: hits.into(),
            misses: misses.into(),
            keys_added: keys_added.into(),
            keys_evicted: keys_evicted.into(),
            ..Default::default()
        },
    )
}

fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z][a-z0-9]{0,8}"]
}

/// Property: the ratio sample is always a finite share
#[test]
fn proptest_ratio_is_bounded() {
    proptest!(|(snapshot in arb_snapshot())| {
        let collector = MetricsCollector::with_counters(
            Arc::new(snapshot),
            CollectorConfig::new().with_hits_ratio_gauge_metric(),
        ).unwrap();

        let ratio = sample_value(&scrape(&collector), "ristretto_hits_ratio").unwrap();
        prop_assert!(ratio.is_finite());
        prop_assert!((0.0..=1.0).contains(&ratio));
    });
}

/// Property: all built-ins appear once and counters match the snapshot
#[test]
fn proptest_every_builtin_emitted_once() {
    proptest!(|(snapshot in arb_snapshot())| {
        let collector = MetricsCollector::with_counters(
            Arc::new(snapshot),
            CollectorConfig::new().with_all_builtins().with_all_builtins(),
        ).unwrap();

        let output = scrape(&collector);
        for metric in BuiltinMetric::ALL {
            let type_line = format!("# TYPE {} ", metric.metric_name());
            prop_assert_eq!(output.matches(&type_line).count(), 1);
        }
        prop_assert_eq!(
            sample_value(&output, "ristretto_hits_total"),
            Some(snapshot.hits as f64)
        );
        prop_assert_eq!(
            sample_value(&output, "ristretto_keys_evicted_total"),
            Some(snapshot.keys_evicted as f64)
        );
    });
}

/// Property: joined names have no leading, trailing or doubled separators
#[test]
fn proptest_fq_name_has_no_stray_separators() {
    proptest!(|(namespace in arb_segment(), subsystem in arb_segment(), name in "[a-z][a-z_]{0,8}[a-z]")| {
        let fq = build_fq_name(&namespace, &subsystem, &name);
        prop_assert!(!fq.starts_with('_'));
        prop_assert!(fq.ends_with(&name));
        prop_assert!(!fq.contains("__") || name.contains("__"));
    });
}
