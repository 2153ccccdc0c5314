use std::path::PathBuf;

use jcr_import::UuidBehavior;
use serde::Deserialize;

/// Import configuration using environment variables
#[derive(Debug, PartialEq, Deserialize)]
pub struct EnvConfig {
    pub uuid_behavior: Option<UuidBehavior>,
    pub temp_dir: Option<PathBuf>,
}

impl EnvConfig {
    /// Prefix of the environment variables
    pub const PREFIX: &'static str = "JCR_IMPORT_";

    /// Retrieves configuration from environment variables prefixed with [`Self::PREFIX`]
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(Self::PREFIX).from_env()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            envy::from_iter::<_, EnvConfig>([
                ("UUID_BEHAVIOR".to_owned(), "remove-existing".to_owned()),
                ("TEMP_DIR".to_owned(), "/var/tmp/import".to_owned()),
            ])
            .unwrap(),
            EnvConfig {
                uuid_behavior: Some(UuidBehavior::RemoveExisting),
                temp_dir: Some("/var/tmp/import".into()),
            }
        );
    }

    #[test]
    fn parse_empty() {
        assert_eq!(
            envy::from_iter::<_, EnvConfig>(Vec::<(String, String)>::new()).unwrap(),
            EnvConfig {
                uuid_behavior: None,
                temp_dir: None,
            }
        );
    }

    #[test]
    fn parse_invalid() {
        assert!(envy::from_iter::<_, EnvConfig>([(
            "UUID_BEHAVIOR".to_owned(),
            "sometimes".to_owned()
        )])
        .is_err());
    }
}
