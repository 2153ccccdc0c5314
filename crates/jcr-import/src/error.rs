use jcr_value::ValueError;
use thiserror::Error;

use crate::QName;

/// Domain-level import failures. Any of these terminates the import.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("unknown node type {0}")]
    NoSuchNodeType(QName),

    #[error("a node with UUID {uuid} already exists")]
    ItemExists { uuid: String },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("unknown namespace prefix `{0}`")]
    UnknownPrefix(String),

    #[error("no prefix is mapped to namespace `{0}`")]
    UnknownNamespace(String),

    #[error("illegal name `{0}`")]
    IllegalName(String),

    #[error("unknown property type `{0}`")]
    UnknownPropertyType(String),

    #[error("invalid UUID behavior `{0}`")]
    InvalidUuidBehavior(String),

    #[error("import callbacks out of order: {0}")]
    Protocol(&'static str),

    #[error("failed to read serialized value")]
    Value(#[from] ValueError),
}
