use crate::config::NisseConfiguration;
use crate::error::{NisseError, Result};
use crate::source::PropertySource;
use std::collections::BTreeMap;

/// Configuration key holding the Maven version running the build
pub const MAVEN_VERSION: &str = "maven.version";

pub const VERSION: &str = "version";
pub const MAJOR: &str = "major";
pub const MINOR: &str = "minor";
pub const MAJOR_MINOR: &str = "majorMinor";
pub const PATCH: &str = "patch";
pub const QUALIFIER: &str = "qualifier";

/// Publishes the Maven version (`maven.version`) split into its parts.
pub struct MvnPropertySource;

impl MvnPropertySource {
    pub const NAME: &'static str = "mvn";
}

impl PropertySource for MvnPropertySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn properties(&self, configuration: &NisseConfiguration) -> Result<BTreeMap<String, String>> {
        let mut result = BTreeMap::new();
        let maven_version = match configuration.get(MAVEN_VERSION) {
            Some(version) => version,
            None => return Ok(result),
        };

        result.insert(VERSION.to_string(), maven_version.to_string());
        let release = match maven_version.split_once('-') {
            Some((release, qualifier)) => {
                result.insert(QUALIFIER.to_string(), qualifier.to_string());
                release
            }
            None => maven_version,
        };

        let parts: Vec<&str> = release.split('.').collect();
        if parts.len() < 3 {
            return Err(NisseError::version(format!(
                "{} '{}' is not MAJOR.MINOR.PATCH",
                MAVEN_VERSION, maven_version
            )));
        }
        result.insert(MAJOR.to_string(), parts[0].to_string());
        result.insert(MINOR.to_string(), parts[1].to_string());
        result.insert(
            MAJOR_MINOR.to_string(),
            format!("{}.{}", parts[0], parts[1]),
        );
        result.insert(PATCH.to_string(), parts[2].to_string());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(maven_version: Option<&str>) -> Result<BTreeMap<String, String>> {
        let builder = NisseConfiguration::builder();
        let builder = match maven_version {
            Some(version) => builder.with_user_property(MAVEN_VERSION, version),
            None => builder,
        };
        MvnPropertySource.properties(&builder.build().unwrap())
    }

    #[test]
    fn test_release_version() {
        let props = properties(Some("3.9.6")).unwrap();
        assert_eq!(props[VERSION], "3.9.6");
        assert_eq!(props[MAJOR], "3");
        assert_eq!(props[MINOR], "9");
        assert_eq!(props[MAJOR_MINOR], "3.9");
        assert_eq!(props[PATCH], "6");
        assert!(!props.contains_key(QUALIFIER));
    }

    #[test]
    fn test_qualified_version() {
        let props = properties(Some("4.0.0-beta-3")).unwrap();
        assert_eq!(props[VERSION], "4.0.0-beta-3");
        assert_eq!(props[QUALIFIER], "beta-3");
        assert_eq!(props[MAJOR_MINOR], "4.0");
        assert_eq!(props[PATCH], "0");
    }

    #[test]
    fn test_without_maven_version() {
        assert!(properties(None).unwrap().is_empty());
    }

    #[test]
    fn test_short_version_is_an_error() {
        assert!(matches!(
            properties(Some("3.9")),
            Err(NisseError::InvalidVersionSpec(_))
        ));
    }
}
