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
//! Error types for collector configuration and registration

use thiserror::Error;

/// Errors raised while building or registering a [`MetricsCollector`](crate::MetricsCollector)
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Two registered descriptors resolve to the same fully-qualified name
    #[error("Duplicate metric name: {name} is exported by more than one descriptor")]
    DuplicateMetricName {
        /// The colliding fully-qualified name
        name: String,
    },

    /// A descriptor could not be turned into a Prometheus descriptor
    #[error("Invalid metric descriptor '{name}': {source}")]
    InvalidDescriptor {
        /// Fully-qualified name of the offending descriptor
        name: String,
        /// Underlying validation failure
        #[source]
        source: prometheus::Error,
    },

    /// A built-in metric key that is not part of the catalog
    #[error("Unknown built-in metric: {0}. Expected one of: {expected}", expected = crate::catalog::BuiltinMetric::keys().join(", "))]
    UnknownMetric(String),

    /// The external registry refused the collector
    #[error("Prometheus registry error: {0}")]
    Registry(#[from] prometheus::Error),
}

impl CollectorError {
    /// Build a duplicate-name error
    pub fn duplicate_metric_name(name: impl Into<String>) -> Self {
        CollectorError::DuplicateMetricName { name: name.into() }
    }

    /// Build an invalid-descriptor error
    pub fn invalid_descriptor(name: impl Into<String>, source: prometheus::Error) -> Self {
        CollectorError::InvalidDescriptor {
            name: name.into(),
            source,
        }
    }

    /// The fully-qualified name this error is about, if any
    pub fn metric_name(&self) -> Option<&str> {
        match self {
            CollectorError::DuplicateMetricName { name }
            | CollectorError::InvalidDescriptor { name, .. } => Some(name),
            CollectorError::UnknownMetric(_) | CollectorError::Registry(_) => None,
        }
    }
}

/// Result alias used across the crate
pub type CollectorResult<T> = Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_metric_name_message() {
        let err = CollectorError::duplicate_metric_name("app_ristretto_hits_total");
        assert_eq!(err.metric_name(), Some("app_ristretto_hits_total"));
        assert!(err.to_string().contains("app_ristretto_hits_total"));
        assert!(err.to_string().starts_with("Duplicate metric name"));
    }

    #[test]
    fn test_unknown_metric_lists_catalog() {
        let err = CollectorError::UnknownMetric("hitz".to_string());
        let message = err.to_string();
        assert!(message.contains("hitz"));
        assert!(message.contains("hits_ratio"));
        assert_eq!(err.metric_name(), None);
    }

    #[test]
    fn test_registry_error_conversion() {
        let err: CollectorError = prometheus::Error::AlreadyReg.into();
        assert!(matches!(err, CollectorError::Registry(_)));
    }
}
