//! Entry and group status enumerations.

use super::{ParseEntryStatusError, ParseGroupStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an installed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Freshly installed; never probed or updated.
    Installed,
    /// The last health probe succeeded.
    Healthy,
    /// The last health probe failed.
    Error,
    /// The configuration was replaced.
    Updated,
}

impl EntryStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Healthy => "healthy",
            Self::Error => "error",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EntryStatus {
    type Error = ParseEntryStatusError;

    fn try_from(value: &str) -> Result<Self, ParseEntryStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "installed" => Ok(Self::Installed),
            "healthy" => Ok(Self::Healthy),
            "error" => Ok(Self::Error),
            "updated" => Ok(Self::Updated),
            _ => Err(ParseEntryStatusError(value.to_owned())),
        }
    }
}

/// Status of a deployed group.
///
/// The only transition is `deployed -> inactive`, taken when the last member
/// is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// The group has at least one member.
    Deployed,
    /// Every member has been removed.
    Inactive,
}

impl GroupStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GroupStatus {
    type Error = ParseGroupStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "deployed" => Ok(Self::Deployed),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseGroupStatusError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntryStatus::Installed)]
    #[case(EntryStatus::Healthy)]
    #[case(EntryStatus::Error)]
    #[case(EntryStatus::Updated)]
    fn entry_status_parses_its_own_string_form(#[case] status: EntryStatus) {
        assert_eq!(EntryStatus::try_from(status.as_str()), Ok(status));
    }

    #[test]
    fn unknown_statuses_are_rejected() {
        assert!(EntryStatus::try_from("running").is_err());
        assert!(GroupStatus::try_from("deleted").is_err());
    }

    #[test]
    fn group_status_parsing_ignores_case() {
        assert_eq!(GroupStatus::try_from(" Inactive "), Ok(GroupStatus::Inactive));
    }
}
