//! Identifier and validated-string types for entries and groups.

use super::{ParseGroupIdError, RegistryDomainError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum length for an entry name.
const MAX_ENTRY_NAME_LENGTH: usize = 100;

/// Prefix of the canonical group identifier form, e.g. `project_3`.
const GROUP_ID_PREFIX: &str = "project_";

/// Validated entry name. Unique key of the entry registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryName(String);

impl EntryName {
    /// Creates a validated entry name.
    ///
    /// The input is trimmed; case is preserved. Only ASCII alphanumerics,
    /// `_`, `-` and `.` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptyEntryName);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_alphanumeric() || matches!(character, '_' | '-' | '.')
        });
        if !is_valid {
            return Err(RegistryDomainError::InvalidEntryName(normalized));
        }

        if normalized.len() > MAX_ENTRY_NAME_LENGTH {
            return Err(RegistryDomainError::EntryNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the entry name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for EntryName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Opaque reference to where an entry was installed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// Creates a source locator from trimmed, non-empty text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptySourceLocator`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptySourceLocator);
        }
        Ok(Self(normalized))
    }

    /// Returns the locator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Human-provided group name. Not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a display name from trimmed, non-empty text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyDisplayName`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptyDisplayName);
        }
        Ok(Self(normalized))
    }

    /// Returns the URL slug: lower-cased with spaces replaced by hyphens.
    #[must_use]
    pub fn slug(&self) -> String {
        self.0.to_lowercase().replace(' ', "-")
    }

    /// Returns the display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Sequential group identifier, rendered as `project_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(u64);

impl GroupId {
    /// The first identifier issued by an empty registry.
    pub const FIRST: Self = Self(1);

    /// Creates an identifier from its sequence number.
    #[must_use]
    pub const fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }

    /// Returns the identifier issued after this one.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{GROUP_ID_PREFIX}{}", self.0)
    }
}

impl TryFrom<&str> for GroupId {
    type Error = ParseGroupIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value
            .trim()
            .strip_prefix(GROUP_ID_PREFIX)
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| ParseGroupIdError(value.to_owned()))
    }
}

impl TryFrom<String> for GroupId {
    type Error = ParseGroupIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<GroupId> for String {
    fn from(value: GroupId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alpha", "alpha")]
    #[case("  Weather-Tools.v2 ", "Weather-Tools.v2")]
    #[case("fs_server", "fs_server")]
    fn entry_name_accepts_and_trims(#[case] input: &str, #[case] expected: &str) {
        let name = EntryName::new(input).expect("valid entry name");
        assert_eq!(name.as_str(), expected);
    }

    #[rstest]
    #[case("", RegistryDomainError::EmptyEntryName)]
    #[case("   ", RegistryDomainError::EmptyEntryName)]
    #[case("has space", RegistryDomainError::InvalidEntryName("has space".to_owned()))]
    #[case("slash/name", RegistryDomainError::InvalidEntryName("slash/name".to_owned()))]
    fn entry_name_rejects_invalid_input(
        #[case] input: &str,
        #[case] expected: RegistryDomainError,
    ) {
        assert_eq!(EntryName::new(input), Err(expected));
    }

    #[test]
    fn entry_name_rejects_overlong_input() {
        let long_name = "a".repeat(101);
        assert!(matches!(
            EntryName::new(long_name),
            Err(RegistryDomainError::EntryNameTooLong(_))
        ));
    }

    #[test]
    fn display_name_slug_lowercases_and_hyphenates() {
        let name = DisplayName::new("My Cloud Project").expect("valid display name");
        assert_eq!(name.slug(), "my-cloud-project");
    }

    #[test]
    fn blank_source_locator_is_rejected() {
        assert_eq!(
            SourceLocator::new("  "),
            Err(RegistryDomainError::EmptySourceLocator)
        );
    }

    #[rstest]
    #[case("project_1", Some(1))]
    #[case("project_42", Some(42))]
    #[case("project_", None)]
    #[case("42", None)]
    #[case("project_x", None)]
    fn group_id_parses_canonical_form(#[case] input: &str, #[case] expected: Option<u64>) {
        let parsed = GroupId::try_from(input).ok().map(GroupId::sequence);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn group_id_serializes_as_canonical_string() {
        let value = serde_json::to_value(GroupId::from_sequence(7)).expect("serializable id");
        assert_eq!(value, serde_json::json!("project_7"));
    }
}
