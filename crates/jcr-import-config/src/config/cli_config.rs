use std::path::PathBuf;

use clap::Parser;
use jcr_import::UuidBehavior;

/// Command-line interface (CLI) import configuration
#[derive(Debug, PartialEq, Parser)]
pub struct CliConfig {
    /// How to handle nodes whose UUID already exists: create-new, remove-existing,
    /// replace-existing or throw
    #[arg(long)]
    pub uuid_behavior: Option<UuidBehavior>,

    /// Directory for temporary files of large property values
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            CliConfig::parse_from([
                "jcr-import",
                "--uuid-behavior",
                "throw",
                "--temp-dir",
                "spill",
            ]),
            CliConfig {
                uuid_behavior: Some(UuidBehavior::Throw),
                temp_dir: Some("spill".into()),
            }
        );
    }

    #[test]
    fn parse_invalid() {
        assert!(CliConfig::try_parse_from(["jcr-import", "--uuid-behavior", "never"]).is_err());
    }
}
