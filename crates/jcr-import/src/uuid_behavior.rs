use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::RepositoryError;

/// How an [`Importer`](crate::Importer) handles a node whose UUID already exists in the workspace.
///
/// Chosen once when the importer is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UuidBehavior {
    /// Assign a new UUID to every imported referenceable node
    #[default]
    CreateNew = 0,
    /// Remove the existing node before importing
    RemoveExisting = 1,
    /// Replace the existing node in place
    ReplaceExisting = 2,
    /// Fail the import with [`RepositoryError::ItemExists`]
    Throw = 3,
}

impl UuidBehavior {
    pub const IMPORT_UUID_CREATE_NEW: i32 = Self::CreateNew.code();
    pub const IMPORT_UUID_COLLISION_REMOVE_EXISTING: i32 = Self::RemoveExisting.code();
    pub const IMPORT_UUID_COLLISION_REPLACE_EXISTING: i32 = Self::ReplaceExisting.code();
    pub const IMPORT_UUID_COLLISION_THROW: i32 = Self::Throw.code();

    const ALL: [Self; 4] = [
        Self::CreateNew,
        Self::RemoveExisting,
        Self::ReplaceExisting,
        Self::Throw,
    ];

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateNew => "create-new",
            Self::RemoveExisting => "remove-existing",
            Self::ReplaceExisting => "replace-existing",
            Self::Throw => "throw",
        }
    }
}

impl TryFrom<i32> for UuidBehavior {
    type Error = RepositoryError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|behavior| behavior.code() == code)
            .ok_or_else(|| RepositoryError::InvalidUuidBehavior(code.to_string()))
    }
}

impl FromStr for UuidBehavior {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|behavior| behavior.name() == s)
            .ok_or_else(|| RepositoryError::InvalidUuidBehavior(s.to_owned()))
    }
}

impl fmt::Display for UuidBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
