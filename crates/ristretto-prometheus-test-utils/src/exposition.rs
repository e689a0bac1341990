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
//! Exposition-format helpers and assertions.

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Registry, TextEncoder};

/// Encode metric families in the Prometheus text format.
pub fn encode_families(families: &[MetricFamily]) -> String {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(families, &mut buffer)
        .expect("text encoding into a Vec cannot fail");
    String::from_utf8(buffer).expect("text exposition is UTF-8")
}

/// Collect `collector` once and encode the result.
pub fn scrape(collector: &dyn Collector) -> String {
    encode_families(&collector.collect())
}

/// Gather `registry` and encode the result.
pub fn scrape_registry(registry: &Registry) -> String {
    encode_families(&registry.gather())
}

/// Strip indentation and blank lines so expectations can be written inline.
pub fn normalize_exposition(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Assert that `actual` equals the indented `expected` exposition.
pub fn assert_exposition_eq(actual: &str, expected: &str) {
    let expected = normalize_exposition(expected);
    let actual = normalize_exposition(actual);
    assert_eq!(
        actual, expected,
        "unexpected collecting result:\n--- actual ---\n{actual}--- expected ---\n{expected}"
    );
}

/// Value of the first sample line named `name`, labels included, e.g.
/// `ristretto_hits_total{cacheName="A"}`.
pub fn sample_value(exposition: &str, name: &str) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (series, value) = line.rsplit_once(' ')?;
            (series == name).then(|| value.parse().ok()).flatten()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_exposition() {
        let text = "
            # TYPE a counter
            a 1
        ";
        assert_eq!(normalize_exposition(text), "# TYPE a counter\na 1\n");
    }

    #[test]
    fn test_sample_value() {
        let text = "# TYPE a counter\na{x=\"1\"} 3\nb 0.5\n";
        assert_eq!(sample_value(text, "a{x=\"1\"}"), Some(3.0));
        assert_eq!(sample_value(text, "b"), Some(0.5));
        assert_eq!(sample_value(text, "c"), None);
    }
}
