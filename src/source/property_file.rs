use crate::config::NisseConfiguration;
use crate::error::Result;
use crate::naming::PROPERTY_PREFIX;
use crate::properties;
use crate::source::PropertySource;
use std::collections::BTreeMap;
use tracing::debug;

/// Publishes every entry of a user supplied properties file.
///
/// The file is named by `nisse.property-file.name`, relative to the current
/// working directory. Without that key, or when the file is missing, the
/// source publishes nothing.
pub struct PropertyFilePropertySource;

impl PropertyFilePropertySource {
    pub const NAME: &'static str = "property-file";

    /// Configuration key naming the file to publish
    pub fn file_name_key() -> String {
        format!("{}{}.name", PROPERTY_PREFIX, Self::NAME)
    }
}

impl PropertySource for PropertyFilePropertySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn properties(&self, configuration: &NisseConfiguration) -> Result<BTreeMap<String, String>> {
        let file_name = match configuration.get(&Self::file_name_key()) {
            Some(name) => name,
            None => return Ok(BTreeMap::new()),
        };

        let path = configuration.current_working_directory().join(file_name);
        if !path.is_file() {
            debug!("Property file {} does not exist", path.display());
            return Ok(BTreeMap::new());
        }

        properties::load(&path)
    }
}
