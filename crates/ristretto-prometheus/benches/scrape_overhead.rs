//! Benchmark scrape cost
//!
//! Measures how long one collection takes with all built-ins enabled, with
//! and without counters attached, and with the text encoding included.

use criterion::{criterion_group, criterion_main, Criterion};
use prometheus::core::Collector;
use ristretto_prometheus::{
    CollectorConfig, CountersSnapshot, Encoder, MetricsCollector, TextEncoder,
};
use std::hint::black_box;
use std::sync::Arc;

fn busy_counters() -> Arc<CountersSnapshot> {
    Arc::new(CountersSnapshot {
        hits: 49_000,
        misses: 20_000,
        keys_added: 123_000,
        cost_added: 123_000,
        keys_evicted: 1_000,
        cost_evicted: 1_000,
        sets_dropped: 12,
        sets_rejected: 34,
        gets_dropped: 56,
        gets_kept: 69_000,
    })
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");

    let attached = MetricsCollector::with_counters(
        busy_counters(),
        CollectorConfig::new()
            .with_namespace("bench")
            .with_const_labels([("cacheName", "A")])
            .with_all_builtins(),
    )
    .unwrap();
    group.bench_function("all_builtins", |b| b.iter(|| black_box(attached.collect())));

    let detached = MetricsCollector::new(None, CollectorConfig::new().with_all_builtins()).unwrap();
    group.bench_function("all_builtins_no_counters", |b| {
        b.iter(|| black_box(detached.collect()))
    });

    group.finish();
}

fn bench_collect_and_encode(c: &mut Criterion) {
    let collector =
        MetricsCollector::with_counters(busy_counters(), CollectorConfig::new().with_all_builtins())
            .unwrap();
    let encoder = TextEncoder::new();

    c.bench_function("collect_and_encode", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(4096);
            encoder.encode(&collector.collect(), &mut buffer).unwrap();
            black_box(buffer)
        })
    });
}

criterion_group!(benches, bench_collect, bench_collect_and_encode);
criterion_main!(benches);
