//! Plain records describing one serialized node or property occurrence.

use std::{fmt, str::FromStr};

use jcr_value::{AppendableValue, Value};
use tracing::warn;

use crate::{QName, RepositoryError};

/// One serialized node occurrence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeInfo {
    pub name: QName,
    /// `None` if the node type is to be inferred
    pub node_type_name: Option<QName>,
    pub mixin_names: Vec<QName>,
    pub uuid: Option<String>,
}

impl NodeInfo {
    pub fn new(
        name: QName,
        node_type_name: Option<QName>,
        mixin_names: Vec<QName>,
        uuid: Option<String>,
    ) -> Self {
        Self {
            name,
            node_type_name,
            mixin_names,
            uuid,
        }
    }
}

/// One serialized property occurrence.
///
/// A single-valued property has exactly one value.
#[derive(Debug)]
pub struct PropInfo {
    pub name: QName,
    pub property_type: PropertyType,
    pub values: Vec<Value>,
}

impl PropInfo {
    pub fn new(name: QName, property_type: PropertyType, values: Vec<Value>) -> Self {
        Self {
            name,
            property_type,
            values,
        }
    }

    /// Disposes every [`AppendableValue`] among the values.
    ///
    /// Disposal errors are logged and don't stop the remaining values from being disposed.
    /// Returns the number of values disposed successfully.
    pub fn dispose_values(&mut self) -> usize {
        let mut disposed = 0;
        for value in &mut self.values {
            let Some(value) = value.as_appendable_mut() else {
                continue;
            };
            match value.dispose() {
                Ok(()) => disposed += 1,
                Err(err) => {
                    warn!(
                        property = %self.name,
                        error = %err,
                        "error while disposing temporary value"
                    );
                }
            }
        }
        disposed
    }
}

/// The type of a property as declared in the import document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyType {
    #[default]
    Undefined = 0,
    String = 1,
    Binary = 2,
    Long = 3,
    Double = 4,
    Date = 5,
    Boolean = 6,
    Name = 7,
    Path = 8,
    Reference = 9,
}

impl PropertyType {
    pub const ALL: [Self; 10] = [
        Self::Undefined,
        Self::String,
        Self::Binary,
        Self::Long,
        Self::Double,
        Self::Date,
        Self::Boolean,
        Self::Name,
        Self::Path,
        Self::Reference,
    ];

    /// The integer tag of the type
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::String => "String",
            Self::Binary => "Binary",
            Self::Long => "Long",
            Self::Double => "Double",
            Self::Date => "Date",
            Self::Boolean => "Boolean",
            Self::Name => "Name",
            Self::Path => "Path",
            Self::Reference => "Reference",
        }
    }
}

impl TryFrom<i32> for PropertyType {
    type Error = RepositoryError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.code() == code)
            .ok_or_else(|| RepositoryError::UnknownPropertyType(code.to_string()))
    }
}

impl FromStr for PropertyType {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| RepositoryError::UnknownPropertyType(s.to_owned()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
