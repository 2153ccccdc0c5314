//! # Import configuration
//!
//! Settings of an XML import that aren't part of the document itself, gathered from the
//! command line, `JCR_IMPORT_*` environment variables and a `.jcr-import.toml` file.

pub mod config;

pub use config::{ConfigError, ImportConfig};
