use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use cli_config::CliConfig;
use env_config::EnvConfig;
use jcr_import::{Importer, NamespaceResolver, TargetImportHandler, UuidBehavior};
use thiserror::Error;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub mod cli_config;
pub mod env_config;
pub mod toml_config;

/// Picks the first configured value of `$field` from optional config layers, highest priority
/// first.
///
/// A leading `cli` layer is skipped without the `cli` feature. Use `@without_cli` to list the
/// layers explicitly.
macro_rules! config_field {
  ($cli:ident, $($rest:ident),+; $field:ident) => {
    {
        #[cfg(feature = "cli")]
        { config_field!(@without_cli $cli, $($rest),+; $field) }
        #[cfg(not(feature = "cli"))]
        { config_field!(@without_cli $($rest),+; $field) }
    }
  };
  (@without_cli $start:ident$(, $fallback:ident)*; $field:ident) => {
      $start.as_ref().and_then(|value| value.$field.clone())
        $(
        .or_else(|| $fallback.as_ref().and_then(|value| value.$field.clone()))
        )*
  };
}

/// A composite import configuration from multiple sources with following ordering:
///
/// - [`CliConfig`] (if `cli` feature is enabled)
/// - [`EnvConfig`]
/// - [`TomlConfig`]
#[derive(Debug, Default, PartialEq)]
pub struct ImportConfig {
    uuid_behavior: UuidBehavior,
    temp_dir: Option<PathBuf>,
}

impl ImportConfig {
    /// Merges [`CliConfig`] (if `cli` feature is enabled), [`EnvConfig`] and [`TomlConfig`]
    #[must_use]
    pub fn merge(
        #[cfg(feature = "cli")] cli: Option<CliConfig>,
        env: Option<EnvConfig>,
        toml: Option<TomlConfig>,
    ) -> Self {
        Self {
            uuid_behavior: config_field!(cli, env, toml; uuid_behavior).unwrap_or_default(),
            temp_dir: config_field!(cli, env, toml; temp_dir),
        }
    }

    /// Loads [`EnvConfig`] and the [`TomlConfig`] found in `start` or its ancestors, then merges
    /// them with `cli`.
    ///
    /// A missing config file is not an error.
    pub fn load(
        start: &Path,
        #[cfg(feature = "cli")] cli: Option<CliConfig>,
    ) -> Result<Self, ConfigError> {
        let toml = TomlConfig::find(start)
            .map(|path| {
                tracing::debug!(path = %path.display(), "loading import config");
                TomlConfig::load(&path)
            })
            .transpose()?;
        let env = EnvConfig::from_env()?;

        Ok(Self::merge(
            #[cfg(feature = "cli")]
            cli,
            Some(env),
            toml,
        ))
    }

    #[must_use]
    pub fn uuid_behavior(&self) -> UuidBehavior {
        self.uuid_behavior
    }

    /// Directory for temporary files. `None` is the process' temporary directory.
    #[must_use]
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Creates an import handler whose values spill to [`temp_dir`](Self::temp_dir).
    pub fn handler<I: Importer, N: NamespaceResolver>(
        &self,
        importer: I,
        ns_context: N,
    ) -> TargetImportHandler<I, N> {
        let handler = TargetImportHandler::new(importer, ns_context);
        match &self.temp_dir {
            Some(dir) => handler.with_temp_dir(dir),
            None => handler,
        }
    }
}

/// Errors encountered when loading the import configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize config")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read config from environment")]
    Env(#[from] envy::Error),
}

#[cfg(test)]
mod tests {
    use jcr_import::{
        AppendableValue, NamespaceMap, NodeInfo, PropInfo, RepositoryError, TextValue,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    /// Accepts everything
    struct NopImporter;
    impl Importer for NopImporter {
        fn start(&mut self) -> Result<(), RepositoryError> {
            Ok(())
        }
        fn start_node(
            &mut self,
            _node_info: &NodeInfo,
            _prop_infos: &mut [PropInfo],
            _ns_context: &dyn NamespaceResolver,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }
        fn end_node(&mut self, _node_info: &NodeInfo) -> Result<(), RepositoryError> {
            Ok(())
        }
        fn end(&mut self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[test]
    fn merge() {
        #[cfg(feature = "cli")]
        let cli = CliConfig {
            uuid_behavior: Some(UuidBehavior::Throw),
            temp_dir: None,
        };
        let env = EnvConfig {
            uuid_behavior: Some(UuidBehavior::RemoveExisting),
            temp_dir: None,
        };
        let toml = TomlConfig {
            uuid_behavior: Some(UuidBehavior::ReplaceExisting),
            temp_dir: Some("toml".into()),
        };

        assert_eq!(
            ImportConfig {
                uuid_behavior: if cfg!(feature = "cli") {
                    UuidBehavior::Throw
                } else {
                    UuidBehavior::RemoveExisting
                },
                temp_dir: Some("toml".into()),
            },
            ImportConfig::merge(
                #[cfg(feature = "cli")]
                Some(cli),
                Some(env),
                Some(toml),
            )
        );
    }

    #[test]
    fn merge_defaults() {
        let config = ImportConfig::merge(
            #[cfg(feature = "cli")]
            None,
            None,
            None,
        );
        assert_eq!(config, ImportConfig::default());
        assert_eq!(config.uuid_behavior(), UuidBehavior::CreateNew);
        assert_eq!(config.temp_dir(), None);
    }

    #[test]
    fn load() {
        let config = ImportConfig::load(
            &Path::new("test_data").join("empty"),
            #[cfg(feature = "cli")]
            None,
        )
        .unwrap();
        assert_eq!(config.uuid_behavior(), UuidBehavior::ReplaceExisting);
        assert_eq!(config.temp_dir(), None);
    }

    #[test]
    fn handler_spills_to_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::merge(
            #[cfg(feature = "cli")]
            None,
            None,
            Some(TomlConfig {
                uuid_behavior: None,
                temp_dir: Some(dir.path().to_owned()),
            }),
        );

        let handler = config.handler(NopImporter, NamespaceMap::default());
        let mut value = handler.new_value();
        value.append_str(&"v".repeat(0x10001)).unwrap();
        value.close().unwrap();

        assert_eq!(value.temp_path().unwrap().parent(), Some(dir.path()));
        assert_eq!(value.length().unwrap(), 0x10001);
        value.dispose().unwrap();
    }
}
