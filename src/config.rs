use crate::error::{NisseError, Result};
use crate::naming::{self, NamingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of source configuration keys
pub const SOURCE_PREFIX: &str = "nisse.source.";

/// When `true`, keys of the `os` source are also published the os-maven-plugin way
pub const COMPAT_OS_DETECTOR: &str = "nisse.compat.osDetector";

pub const DYNAMIC_VERSION: &str = "nisse.source.jgit.dynamicVersion";
pub const APPEND_SNAPSHOT: &str = "nisse.source.jgit.appendSnapshot";
pub const APPEND_BUILD_NUMBER: &str = "nisse.source.jgit.appendBuildNumber";
pub const USE_VERSION: &str = "nisse.source.jgit.useVersion";
pub const VERSION_HINT_PATTERN: &str = "nisse.source.jgit.versionHintPattern";
pub const DEFAULT_VERSION: &str = "nisse.source.jgit.defaultVersion";

/// Hint tag pattern used unless configured otherwise
pub const DEFAULT_VERSION_HINT_PATTERN: &str = "${version}-SNAPSHOT";

/// Base version reported when no release tag is reachable from HEAD
pub const DEFAULT_BASE_VERSION: &str = "0.0.1";

const SESSION_ROOT_PLACEHOLDER: &str = "${session.rootDirectory}";

/// Location of the translation table below the session root directory
pub const TRANSLATION_TABLE_PATH: &str = ".mvn/nisse-translation.properties";

/// Parses a boolean the lenient way: `true` in any case is true, anything else false.
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Settings of the dynamic version resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicVersionSettings {
    pub enabled: bool,
    pub append_snapshot: bool,
    pub append_build_number: bool,
    pub use_version: Option<String>,
    pub version_hint_pattern: String,
    pub default_version: String,
}

impl Default for DynamicVersionSettings {
    fn default() -> Self {
        DynamicVersionSettings {
            enabled: false,
            append_snapshot: true,
            append_build_number: true,
            use_version: None,
            version_hint_pattern: DEFAULT_VERSION_HINT_PATTERN.to_string(),
            default_version: DEFAULT_BASE_VERSION.to_string(),
        }
    }
}

impl DynamicVersionSettings {
    /// Read the settings from a configuration map, defaulting absent keys
    pub fn from_map(configuration: &HashMap<String, String>) -> Self {
        let defaults = DynamicVersionSettings::default();
        let flag = |key: &str, default: bool| {
            configuration
                .get(key)
                .map(|value| parse_bool(value))
                .unwrap_or(default)
        };

        DynamicVersionSettings {
            enabled: flag(DYNAMIC_VERSION, defaults.enabled),
            append_snapshot: flag(APPEND_SNAPSHOT, defaults.append_snapshot),
            append_build_number: flag(APPEND_BUILD_NUMBER, defaults.append_build_number),
            use_version: configuration.get(USE_VERSION).cloned(),
            version_hint_pattern: configuration
                .get(VERSION_HINT_PATTERN)
                .cloned()
                .unwrap_or(defaults.version_hint_pattern),
            default_version: configuration
                .get(DEFAULT_VERSION)
                .cloned()
                .unwrap_or(defaults.default_version),
        }
    }

    /// Whether hint tags follow [DEFAULT_VERSION_HINT_PATTERN]
    pub fn uses_default_hint_pattern(&self) -> bool {
        self.version_hint_pattern == DEFAULT_VERSION_HINT_PATTERN
    }
}

/// Effective configuration of one build.
///
/// Built once through [NisseConfigurationBuilder] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NisseConfiguration {
    configuration: HashMap<String, String>,
    current_working_directory: PathBuf,
    session_root_directory: PathBuf,
    naming_strategy: NamingStrategy,
}

impl NisseConfiguration {
    pub fn builder() -> NisseConfigurationBuilder {
        NisseConfigurationBuilder::default()
    }

    /// System properties overlaid with user properties
    pub fn configuration(&self) -> &HashMap<String, String> {
        &self.configuration
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.configuration.get(key).map(String::as_str)
    }

    pub fn current_working_directory(&self) -> &Path {
        &self.current_working_directory
    }

    pub fn session_root_directory(&self) -> &Path {
        &self.session_root_directory
    }

    pub fn naming_strategy(&self) -> &NamingStrategy {
        &self.naming_strategy
    }

    /// Sources are active unless `nisse.source.<name>.active` is set to something other than `true`
    pub fn is_property_source_active(&self, name: &str) -> bool {
        let key = format!("{}{}.active", SOURCE_PREFIX, name);
        self.get(&key).map(parse_bool).unwrap_or(true)
    }

    pub fn dynamic_version_settings(&self) -> DynamicVersionSettings {
        DynamicVersionSettings::from_map(&self.configuration)
    }
}

/// Builder for [NisseConfiguration].
#[derive(Debug)]
pub struct NisseConfigurationBuilder {
    system_properties: HashMap<String, String>,
    user_properties: HashMap<String, String>,
    current_working_directory: Option<PathBuf>,
    session_root_directory: Option<PathBuf>,
    naming_strategy: Option<NamingStrategy>,
    naming_strategies: Vec<NamingStrategy>,
    translation_table_file: Option<PathBuf>,
    detect_compat_os_detector: bool,
}

impl Default for NisseConfigurationBuilder {
    fn default() -> Self {
        NisseConfigurationBuilder {
            system_properties: HashMap::new(),
            user_properties: HashMap::new(),
            current_working_directory: None,
            session_root_directory: None,
            naming_strategy: None,
            naming_strategies: Vec::new(),
            translation_table_file: None,
            detect_compat_os_detector: true,
        }
    }
}

impl NisseConfigurationBuilder {
    pub fn with_system_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.system_properties = properties;
        self
    }

    /// Use the process environment variables as system properties
    pub fn with_environment(self) -> Self {
        self.with_system_properties(std::env::vars().collect())
    }

    pub fn with_user_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.user_properties = properties;
        self
    }

    pub fn with_user_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_current_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_working_directory = Some(path.into());
        self
    }

    pub fn with_session_root_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_root_directory = Some(path.into());
        self
    }

    /// Use this strategy as-is, ignoring anything added by [Self::combine_naming_strategy]
    pub fn with_naming_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.naming_strategy = Some(strategy);
        self
    }

    /// Add a strategy to the list combined with [naming::fork].
    ///
    /// The default strategy is not added implicitly once this is used.
    pub fn combine_naming_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.naming_strategies.push(strategy);
        self
    }

    /// Rename keys through the translation table in `path`, if the file exists
    pub fn with_translation_table_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.translation_table_file = Some(path.into());
        self
    }

    /// Rename keys through `.mvn/nisse-translation.properties` below the session root, if present
    pub fn with_default_translation_table(self) -> Self {
        let root = self
            .session_root_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        self.with_translation_table_file(root.join(TRANSLATION_TABLE_PATH))
    }

    pub fn with_detect_compat_os_detector(mut self, detect: bool) -> Self {
        self.detect_compat_os_detector = detect;
        self
    }

    pub fn build(self) -> Result<NisseConfiguration> {
        let current_working_directory = absolute(
            self.current_working_directory
                .unwrap_or_else(|| PathBuf::from(".")),
        )?;
        let session_root_directory = absolute(
            self.session_root_directory
                .unwrap_or_else(|| current_working_directory.clone()),
        )?;

        let root = session_root_directory.to_string_lossy().into_owned();
        let mut configuration = self.system_properties;
        for (key, value) in &self.user_properties {
            configuration.insert(key.clone(), value.replace(SESSION_ROOT_PLACEHOLDER, &root));
        }

        let naming_strategy = match self.naming_strategy {
            Some(strategy) => strategy,
            None => {
                let mut strategies = self.naming_strategies;
                if let Some(path) = &self.translation_table_file {
                    if path.exists() {
                        let table = naming::translation_table_from_properties_file(path)?;
                        strategies.push(naming::translated(
                            table,
                            naming::source_prefixed(),
                            naming::default_strategy(),
                        ));
                    }
                }
                if strategies.is_empty() {
                    strategies.push(naming::default_strategy());
                }
                if self.detect_compat_os_detector
                    && configuration
                        .get(COMPAT_OS_DETECTOR)
                        .map(|v| parse_bool(v))
                        .unwrap_or(false)
                {
                    strategies.push(naming::os_detector_compat());
                }
                naming::fork(strategies)?
            }
        };

        Ok(NisseConfiguration {
            configuration,
            current_working_directory,
            session_root_directory,
            naming_strategy,
        })
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Configuration file contents: a flat `[properties]` table.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `nisse.toml` in current directory
/// 3. `nisse.toml` in the user config directory
/// 4. Empty configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<FileConfig> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./nisse.toml").exists() {
        fs::read_to_string("./nisse.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("nisse.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(FileConfig::default());
        }
    } else {
        return Ok(FileConfig::default());
    };

    toml::from_str(&config_str).map_err(|e| NisseError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" True "));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_dynamic_version_defaults() {
        let settings = DynamicVersionSettings::from_map(&HashMap::new());
        assert!(!settings.enabled);
        assert!(settings.append_snapshot);
        assert!(settings.append_build_number);
        assert_eq!(settings.use_version, None);
        assert_eq!(settings.version_hint_pattern, "${version}-SNAPSHOT");
        assert_eq!(settings.default_version, "0.0.1");
        assert!(settings.uses_default_hint_pattern());
    }

    #[test]
    fn test_dynamic_version_from_map() {
        let settings = DynamicVersionSettings::from_map(&map(&[
            (DYNAMIC_VERSION, "true"),
            (APPEND_SNAPSHOT, "false"),
            (APPEND_BUILD_NUMBER, "no"),
            (USE_VERSION, "9.9.9"),
            (VERSION_HINT_PATTERN, "next-${version}"),
            (DEFAULT_VERSION, "0.1.0"),
        ]));
        assert!(settings.enabled);
        assert!(!settings.append_snapshot);
        assert!(!settings.append_build_number);
        assert_eq!(settings.use_version.as_deref(), Some("9.9.9"));
        assert!(!settings.uses_default_hint_pattern());
        assert_eq!(settings.default_version, "0.1.0");
    }

    #[test]
    fn test_user_properties_override_system() {
        let config = NisseConfiguration::builder()
            .with_system_properties(map(&[("a", "system"), ("b", "system")]))
            .with_user_properties(map(&[("b", "user")]))
            .with_current_working_directory("/work")
            .build()
            .unwrap();

        assert_eq!(config.get("a"), Some("system"));
        assert_eq!(config.get("b"), Some("user"));
    }

    #[test]
    fn test_session_root_placeholder_is_replaced() {
        let config = NisseConfiguration::builder()
            .with_user_property("table", "${session.rootDirectory}/table.properties")
            .with_current_working_directory("/work/module")
            .with_session_root_directory("/work")
            .build()
            .unwrap();

        assert_eq!(config.get("table"), Some("/work/table.properties"));
        assert_eq!(config.session_root_directory(), Path::new("/work"));
        assert_eq!(config.current_working_directory(), Path::new("/work/module"));
    }

    #[test]
    fn test_session_root_defaults_to_working_directory() {
        let config = NisseConfiguration::builder()
            .with_current_working_directory("/work")
            .build()
            .unwrap();
        assert_eq!(config.session_root_directory(), Path::new("/work"));
    }

    #[test]
    fn test_source_active_flag() {
        let config = NisseConfiguration::builder()
            .with_user_property("nisse.source.os.active", "false")
            .build()
            .unwrap();
        assert!(!config.is_property_source_active("os"));
        assert!(config.is_property_source_active("jgit"));
    }

    #[test]
    fn test_default_naming_strategy() {
        let config = NisseConfiguration::builder().build().unwrap();
        assert_eq!(
            config.naming_strategy().apply("os", "name"),
            vec!["nisse.os.name"]
        );
    }

    #[test]
    fn test_os_detector_compat_flag() {
        let config = NisseConfiguration::builder()
            .with_user_property(COMPAT_OS_DETECTOR, "true")
            .build()
            .unwrap();
        assert_eq!(
            config.naming_strategy().apply("os", "name"),
            vec!["nisse.os.name", "os.detected.name"]
        );

        let disabled = NisseConfiguration::builder()
            .with_user_property(COMPAT_OS_DETECTOR, "true")
            .with_detect_compat_os_detector(false)
            .build()
            .unwrap();
        assert_eq!(
            disabled.naming_strategy().apply("os", "name"),
            vec!["nisse.os.name"]
        );
    }

    #[test]
    fn test_combined_strategies_replace_default() {
        let config = NisseConfiguration::builder()
            .combine_naming_strategy(naming::identity())
            .combine_naming_strategy(naming::prefixed("x."))
            .build()
            .unwrap();
        assert_eq!(config.naming_strategy().apply("os", "name"), vec!["name", "x.name"]);
    }

    #[test]
    fn test_explicit_strategy_wins() {
        let config = NisseConfiguration::builder()
            .combine_naming_strategy(naming::prefixed("ignored."))
            .with_naming_strategy(naming::identity())
            .with_user_property(COMPAT_OS_DETECTOR, "true")
            .build()
            .unwrap();
        assert_eq!(config.naming_strategy().apply("os", "name"), vec!["name"]);
    }

    #[test]
    fn test_missing_translation_table_is_ignored() {
        let config = NisseConfiguration::builder()
            .with_translation_table_file("/nonexistent/nisse-translation.properties")
            .build()
            .unwrap();
        assert_eq!(
            config.naming_strategy().apply("jgit", "commit"),
            vec!["nisse.jgit.commit"]
        );
    }

    #[test]
    fn test_file_config_from_toml() {
        let parsed: FileConfig = toml::from_str(
            r#"
[properties]
"nisse.source.jgit.dynamicVersion" = "true"
"nisse.compat.osDetector" = "true"
"#,
        )
        .unwrap();
        assert_eq!(parsed.properties[DYNAMIC_VERSION], "true");
        assert_eq!(parsed.properties.len(), 2);
    }
}
