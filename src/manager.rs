//! Aggregation of all property sources into the published property map.

use crate::config::NisseConfiguration;
use crate::error::NisseError;
use crate::source::{self, mavenize_value, PropertySource};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A source that failed; its properties are missing from the report
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: NisseError,
}

/// Published properties of one build
#[derive(Debug, Default)]
pub struct PropertyReport {
    pub properties: BTreeMap<String, String>,
    pub failures: Vec<SourceFailure>,
}

impl PropertyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the property sources and names their keys
pub struct NisseManager {
    sources: Vec<Box<dyn PropertySource>>,
}

impl NisseManager {
    pub fn new(sources: Vec<Box<dyn PropertySource>>) -> Self {
        NisseManager { sources }
    }

    /// Manager with the built-in sources
    pub fn with_default_sources() -> Self {
        NisseManager::new(source::default_sources())
    }

    /// Run every active source once and publish its keys through the naming strategy.
    ///
    /// A failing source contributes nothing and is listed in
    /// [PropertyReport::failures]; the remaining sources still run. On key
    /// collisions the later source wins.
    pub fn create_properties(&self, configuration: &NisseConfiguration) -> PropertyReport {
        let strategy = configuration.naming_strategy();
        let mut report = PropertyReport::default();

        for source in &self.sources {
            let name = source.name();
            if !configuration.is_property_source_active(name) {
                debug!("Source {} is not active", name);
                continue;
            }

            let raw = match source.properties(configuration) {
                Ok(raw) => raw,
                Err(error) => {
                    warn!("Source {} failed: {}", name, error);
                    report.failures.push(SourceFailure {
                        source: name.to_string(),
                        error,
                    });
                    continue;
                }
            };

            debug!("Source {} provided {} properties", name, raw.len());
            for (key, value) in raw {
                let value = mavenize_value(&value);
                for published in strategy.apply(name, &key) {
                    report.properties.insert(published, value.clone());
                }
            }
        }

        info!("Published {} properties", report.properties.len());
        report
    }
}
