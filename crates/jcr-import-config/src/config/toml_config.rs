use jcr_import::UuidBehavior;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ConfigError;

/// The TOML configuration filename
pub const CONFIG_FILENAME: &str = ".jcr-import.toml";

/// Import configuration in TOML format
#[derive(Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TomlConfig {
    pub uuid_behavior: Option<UuidBehavior>,
    /// Relative to the directory of the config file
    pub temp_dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Looks for [`CONFIG_FILENAME`] in `start` and its ancestors
    #[must_use]
    pub fn find(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|path| path.is_file())
    }

    /// Loads the config file from the file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&fs_err::read_to_string(path)?)?;

        if let Some(temp_dir) = config.temp_dir {
            let config_parent = path.parent().ok_or(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "parent not found",
            )))?;
            config.temp_dir = Some(config_parent.join(temp_dir));
        }

        Ok(config)
    }
}
