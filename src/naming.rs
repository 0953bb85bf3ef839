//! Property key naming strategies.
//!
//! A [NamingStrategy] maps a `(source name, raw key)` pair to zero or more
//! published key names. Strategies are plain function values; the free
//! functions in this module build the basic ones and combine them.
//!
//! ```rust
//! use nisse::naming;
//!
//! let strategy = naming::default_strategy();
//! assert_eq!(strategy.apply("jgit", "commit"), vec!["nisse.jgit.commit"]);
//! ```

use crate::error::{NisseError, Result};
use crate::properties;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The prefix of every key published by the default strategy
pub const PROPERTY_PREFIX: &str = "nisse.";

/// Trailing translation table entry that appends the fallback keys
pub const FALLBACK_TOKEN: &str = "+fallback";

/// Translation table: lookup key to replacement keys
pub type TranslationTable = HashMap<String, Vec<String>>;

type StrategyFn = dyn Fn(&str, &str) -> Vec<String> + Send + Sync;

/// A pure `(source, key) -> keys` function.
#[derive(Clone)]
pub struct NamingStrategy {
    inner: Arc<StrategyFn>,
}

impl NamingStrategy {
    /// Wrap a closure as a strategy
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> Vec<String> + Send + Sync + 'static,
    {
        NamingStrategy { inner: Arc::new(f) }
    }

    /// Apply the strategy to a raw key published by `source`
    pub fn apply(&self, source: &str, key: &str) -> Vec<String> {
        (self.inner)(source, key)
    }
}

impl fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NamingStrategy")
    }
}

/// Publishes keys as the source set them
pub fn identity() -> NamingStrategy {
    NamingStrategy::from_fn(|_, key| vec![key.to_string()])
}

/// Prefixes keys with a static prefix
pub fn prefixed(prefix: impl Into<String>) -> NamingStrategy {
    let prefix = prefix.into();
    NamingStrategy::from_fn(move |_, key| vec![format!("{}{}", prefix, key)])
}

/// Prefixes keys with [PROPERTY_PREFIX]
pub fn nisse_prefixed() -> NamingStrategy {
    prefixed(PROPERTY_PREFIX)
}

/// Prefixes keys with the source name, making them unique across sources
pub fn source_prefixed() -> NamingStrategy {
    NamingStrategy::from_fn(|source, key| vec![format!("{}.{}", source, key)])
}

/// Publishes `os` keys as `os.detected.<key>`, the names used by os-maven-plugin.
///
/// Keys of any other source produce nothing.
pub fn os_detector_compat() -> NamingStrategy {
    NamingStrategy::from_fn(|source, key| {
        if source == "os" {
            vec![format!("os.detected.{}", key)]
        } else {
            Vec::new()
        }
    })
}

/// `nisse.<source>.<key>`
pub fn default_strategy() -> NamingStrategy {
    pipe_all(vec![source_prefixed(), nisse_prefixed()])
}

/// Applies every strategy to the same key and concatenates the outputs in order.
pub fn fork(strategies: Vec<NamingStrategy>) -> Result<NamingStrategy> {
    match strategies.len() {
        0 => Err(NisseError::EmptyStrategyList),
        1 => Ok(strategies.into_iter().next().ok_or(NisseError::EmptyStrategyList)?),
        _ => Ok(NamingStrategy::from_fn(move |source, key| {
            strategies
                .iter()
                .flat_map(|strategy| strategy.apply(source, key))
                .collect()
        })),
    }
}

/// Applies strategies one after another.
///
/// Every key produced by a stage is fed to the next one. A key for which a
/// stage produces nothing is carried into the next stage unchanged.
pub fn pipe(strategies: Vec<NamingStrategy>) -> Result<NamingStrategy> {
    if strategies.is_empty() {
        return Err(NisseError::EmptyStrategyList);
    }
    Ok(pipe_all(strategies))
}

fn pipe_all(mut strategies: Vec<NamingStrategy>) -> NamingStrategy {
    if strategies.len() == 1 {
        if let Some(single) = strategies.pop() {
            return single;
        }
    }

    NamingStrategy::from_fn(move |source, key| {
        let mut keys = vec![key.to_string()];
        for strategy in &strategies {
            let mut next = Vec::with_capacity(keys.len());
            for k in keys {
                let produced = strategy.apply(source, &k);
                if produced.is_empty() {
                    next.push(k);
                } else {
                    next.extend(produced);
                }
            }
            keys = next;
        }
        keys
    })
}

/// Renames keys through a translation table.
///
/// `lookup` turns the incoming key into lookup keys. For each of them:
/// - not in the table: the `fallback` output is used;
/// - in the table with an empty list: nothing is published;
/// - in the table: the listed keys are published, and if the list ends with
///   [FALLBACK_TOKEN] the `fallback` output is appended.
///
/// The token itself never appears in the output.
pub fn translated(
    table: TranslationTable,
    lookup: NamingStrategy,
    fallback: NamingStrategy,
) -> NamingStrategy {
    NamingStrategy::from_fn(move |source, key| {
        let mut result = Vec::new();
        for lookup_key in lookup.apply(source, key) {
            let mut mapped = match table.get(&lookup_key) {
                Some(replacements) => {
                    let mut mapped = replacements.clone();
                    if mapped.last().map(String::as_str) == Some(FALLBACK_TOKEN) {
                        mapped.extend(fallback.apply(source, key));
                    }
                    mapped
                }
                None => fallback.apply(source, key),
            };
            mapped.retain(|k| k != FALLBACK_TOKEN);
            result.extend(mapped);
        }
        result
    })
}

/// Parse translation table entries: values are comma separated, blanks dropped.
pub fn translation_table_from_entries<I>(entries: I) -> TranslationTable
where
    I: IntoIterator<Item = (String, String)>,
{
    entries
        .into_iter()
        .map(|(key, value)| {
            let replacements = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            (key, replacements)
        })
        .collect()
}

/// Load a translation table from a properties file; a missing file yields an empty table.
pub fn translation_table_from_properties_file(path: &Path) -> Result<TranslationTable> {
    if !path.exists() {
        return Ok(TranslationTable::new());
    }
    let entries = properties::load(path)?;
    Ok(translation_table_from_entries(entries))
}
