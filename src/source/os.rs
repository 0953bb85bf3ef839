use crate::config::NisseConfiguration;
use crate::error::Result;
use crate::source::PropertySource;
use std::collections::BTreeMap;

pub const NAME_KEY: &str = "name";
pub const ARCH_KEY: &str = "arch";
pub const BITNESS_KEY: &str = "bitness";
pub const CLASSIFIER_KEY: &str = "classifier";

/// Publishes the platform the build runs on.
///
/// Values are the platform identifiers as reported by the Rust standard
/// library (`linux`, `x86_64`, ...), without any renaming.
pub struct OsPropertySource;

impl OsPropertySource {
    pub const NAME: &'static str = "os";

    fn bitness() -> u32 {
        if cfg!(target_pointer_width = "64") {
            64
        } else if cfg!(target_pointer_width = "32") {
            32
        } else {
            16
        }
    }
}

impl PropertySource for OsPropertySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn properties(&self, _configuration: &NisseConfiguration) -> Result<BTreeMap<String, String>> {
        let name = std::env::consts::OS;
        let arch = std::env::consts::ARCH;

        let mut result = BTreeMap::new();
        result.insert(NAME_KEY.to_string(), name.to_string());
        result.insert(ARCH_KEY.to_string(), arch.to_string());
        result.insert(BITNESS_KEY.to_string(), Self::bitness().to_string());
        result.insert(CLASSIFIER_KEY.to_string(), format!("{}-{}", name, arch));
        Ok(result)
    }
}
