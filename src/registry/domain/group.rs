//! Deployed group record.

use super::{DisplayName, EntryConfiguration, EntryName, GroupId, GroupStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public address synthesized for a group at deployment time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Wraps a rendered endpoint address.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A named set of entries deployed together.
///
/// `merged_configuration` and `endpoint` are computed once at creation and
/// never recomputed. `status` is `inactive` exactly when `members` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    display_name: DisplayName,
    members: Vec<EntryName>,
    merged_configuration: EntryConfiguration,
    status: GroupStatus,
    endpoint: Endpoint,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Group {
    /// Creates a `deployed` group.
    ///
    /// Callers guarantee `members` is non-empty and free of repeats; the
    /// registry checks both before constructing a group.
    #[must_use]
    pub fn new(
        id: GroupId,
        display_name: DisplayName,
        members: Vec<EntryName>,
        merged_configuration: EntryConfiguration,
        endpoint: Endpoint,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let status = if members.is_empty() {
            GroupStatus::Inactive
        } else {
            GroupStatus::Deployed
        };
        Self {
            id,
            display_name,
            members,
            merged_configuration,
            status,
            endpoint,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns member entry names in deployment order.
    #[must_use]
    pub fn members(&self) -> &[EntryName] {
        &self.members
    }

    /// Returns whether `name` is a current member.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member.as_str() == name)
    }

    /// Returns the configuration snapshot taken at deployment.
    #[must_use]
    pub const fn merged_configuration(&self) -> &EntryConfiguration {
        &self.merged_configuration
    }

    /// Returns the group status.
    #[must_use]
    pub const fn status(&self) -> GroupStatus {
        self.status
    }

    /// Returns the endpoint synthesized at deployment.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Drops `name` from the members, going `inactive` once none remain.
    ///
    /// Returns whether the group referenced `name`.
    pub fn remove_member(&mut self, name: &str, clock: &impl Clock) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.as_str() != name);
        if self.members.len() == before {
            return false;
        }

        if self.members.is_empty() {
            self.status = GroupStatus::Inactive;
        }
        self.updated_at = clock.utc();
        true
    }
}
