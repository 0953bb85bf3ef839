//! Property sources - each one contributes raw `key -> value` pairs under its name.

pub mod git;
pub mod mvn;
pub mod os;
pub mod property_file;

pub use git::GitPropertySource;
pub use mvn::MvnPropertySource;
pub use os::OsPropertySource;
pub use property_file::PropertyFilePropertySource;

use crate::config::NisseConfiguration;
use crate::error::Result;
use std::collections::BTreeMap;

/// A source of build properties.
///
/// Keys are raw (unprefixed); the configured naming strategy decides the
/// published names.
pub trait PropertySource: Send + Sync {
    /// Name of the source, used for prefixing and for `nisse.source.<name>.*` keys
    fn name(&self) -> &str;

    /// Compute the properties of this source
    fn properties(&self, configuration: &NisseConfiguration) -> Result<BTreeMap<String, String>>;
}

/// Blank values are published as `"true"`, the way Maven treats bare `-Dkey` flags
pub fn mavenize_value(value: &str) -> String {
    if value.trim().is_empty() {
        "true".to_string()
    } else {
        value.to_string()
    }
}

/// The built-in sources, in publishing order
pub fn default_sources() -> Vec<Box<dyn PropertySource>> {
    vec![
        Box::new(OsPropertySource),
        Box::new(MvnPropertySource),
        Box::new(PropertyFilePropertySource),
        Box::new(GitPropertySource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mavenize_value() {
        assert_eq!(mavenize_value(""), "true");
        assert_eq!(mavenize_value("  "), "true");
        assert_eq!(mavenize_value("x"), "x");
    }

    #[test]
    fn test_default_sources_names() {
        let names: Vec<String> = default_sources()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["os", "mvn", "property-file", "jgit"]);
    }
}
