//! Registry of metric sources
//!
//! Registration order is display order: the status line joins source output
//! in the order the factories were registered.

use crate::metric_source::BoxedMetricSource;

/// Function that creates a metric source
pub type SourceFactory = fn() -> BoxedMetricSource;

/// Information about a registered source
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub key: String,
    pub name: String,
    pub shown_by_default: bool,
}

struct Entry {
    info: SourceInfo,
    factory: SourceFactory,
}

/// Ordered collection of source factories
#[derive(Default)]
pub struct Registry {
    sources: Vec<Entry>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source; re-registering a key replaces the factory in place
    pub fn register_source(&mut self, factory: SourceFactory) {
        let metadata = factory().metadata().clone();
        let info = SourceInfo {
            key: metadata.key,
            name: metadata.name,
            shown_by_default: metadata.shown_by_default,
        };

        match self.sources.iter_mut().find(|e| e.info.key == info.key) {
            Some(existing) => {
                log::debug!("Replacing registered source {}", info.key);
                existing.info = info;
                existing.factory = factory;
            }
            None => self.sources.push(Entry { info, factory }),
        }
    }

    /// Create one instance of every registered source, in registration order
    pub fn create_all(&self) -> Vec<BoxedMetricSource> {
        self.sources.iter().map(|e| (e.factory)()).collect()
    }

    /// List registered sources in registration order
    pub fn list_sources(&self) -> Vec<SourceInfo> {
        self.sources.iter().map(|e| e.info.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::metric_source::{MetricSource, SourceMetadata};
    use crate::snapshot::TelemetrySnapshot;
    use async_trait::async_trait;

    struct Named(SourceMetadata);

    #[async_trait]
    impl MetricSource for Named {
        fn metadata(&self) -> &SourceMetadata {
            &self.0
        }

        async fn render(&mut self, _: &TelemetrySnapshot, _: usize) -> Result<String, SourceError> {
            Ok(self.0.name.clone())
        }
    }

    fn alpha() -> BoxedMetricSource {
        Box::new(Named(SourceMetadata::new("alpha", "Alpha", "", true)))
    }

    fn beta() -> BoxedMetricSource {
        Box::new(Named(SourceMetadata::new("beta", "Beta", "", false)))
    }

    fn alpha_v2() -> BoxedMetricSource {
        Box::new(Named(SourceMetadata::new("alpha", "Alpha 2", "", false)))
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = Registry::new();
        registry.register_source(beta);
        registry.register_source(alpha);

        let keys: Vec<_> = registry.list_sources().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["beta", "alpha"]);

        let created: Vec<_> = registry
            .create_all()
            .iter()
            .map(|s| s.metadata().key.clone())
            .collect();
        assert_eq!(created, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let mut registry = Registry::new();
        registry.register_source(alpha);
        registry.register_source(beta);
        registry.register_source(alpha_v2);

        assert_eq!(registry.len(), 2);
        let first = &registry.list_sources()[0];
        assert_eq!(first.key, "alpha");
        assert_eq!(first.name, "Alpha 2");
        assert!(!first.shown_by_default);
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.create_all().is_empty());
    }
}
