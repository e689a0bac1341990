//! # ristretto-prometheus Test Utilities
//!
//! Shared test utilities for ristretto-prometheus crates providing:
//! - A thread-safe cost-bounded cache with ristretto-style counters
//! - Exposition-format encoding and comparison helpers

pub mod cache;
pub mod exposition;

// Re-export commonly used items at crate root
pub use cache::{TestCache, TestCounters};
pub use exposition::*;
