//! Error types for registry validation and operations.

use super::EntryName;
use super::GroupId;
use thiserror::Error;

/// Errors returned while constructing registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The entry name is empty after trimming.
    #[error("entry name must not be empty")]
    EmptyEntryName,

    /// The entry name contains characters outside `[A-Za-z0-9_.-]`.
    #[error("entry name '{0}' may only contain ASCII alphanumerics, '_', '-' and '.'")]
    InvalidEntryName(String),

    /// The entry name exceeds the 100-character limit.
    #[error("entry name exceeds 100 character limit: {0}")]
    EntryNameTooLong(String),

    /// The source locator is empty after trimming.
    #[error("source locator must not be empty")]
    EmptySourceLocator,

    /// The group display name is empty after trimming.
    #[error("group display name must not be empty")]
    EmptyDisplayName,
}

/// Errors returned by registry operations.
///
/// Every operation validates before it mutates, so an error always leaves
/// the registry exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No entry is registered under the given name.
    #[error("entry '{0}' not found")]
    NotFound(String),

    /// No group has the given identifier.
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    /// An entry with the same name is already installed.
    #[error("entry '{0}' is already installed")]
    DuplicateName(EntryName),

    /// Group creation referenced entries that are not installed.
    #[error("unknown entries: {}", .0.join(", "))]
    UnknownMembers(Vec<String>),

    /// Group creation referenced no entries at all.
    #[error("a group must reference at least one entry")]
    EmptyMemberList,

    /// Replacement configuration text is not a JSON object.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A snapshot could not be restored because it breaks a registry invariant.
    #[error("inconsistent registry snapshot: {0}")]
    InconsistentSnapshot(String),
}

/// Error returned while parsing an entry status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entry status: {0}")]
pub struct ParseEntryStatusError(pub String);

/// Error returned while parsing a group status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown group status: {0}")]
pub struct ParseGroupStatusError(pub String);

/// Error returned while parsing a group identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid group identifier: {0}")]
pub struct ParseGroupIdError(pub String);
