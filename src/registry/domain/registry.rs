//! Owned registry state joining entries and groups.

use super::{
    DisplayName, Endpoint, Entry, EntryConfiguration, EntryName, EntryRegistry, Group, GroupId,
    GroupRegistry, GroupStatus, HealthReport, RegistryError, SourceLocator,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Both registries plus the group id counter.
///
/// Operations that touch entries and groups together (removal cascade,
/// group deployment) run against one value, so callers that guard a
/// `Registry` with a single lock always see a consistent joint state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: EntryRegistry,
    groups: GroupRegistry,
}

/// Result of removing an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntry {
    /// The entry as it was just before removal.
    pub entry: Entry,
    /// Groups whose membership shrank because of the removal.
    pub affected_groups: Vec<GroupId>,
}

/// Serializable image of a [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Entries in installation order.
    pub entries: Vec<Entry>,
    /// Groups in deployment order.
    pub groups: Vec<Group>,
    /// Identifier the next deployed group receives.
    pub next_group_id: GroupId,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry registry.
    #[must_use]
    pub const fn entries(&self) -> &EntryRegistry {
        &self.entries
    }

    /// Returns the group registry.
    #[must_use]
    pub const fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Installs a new entry with its default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] when the name is taken.
    pub fn install(
        &mut self,
        name: EntryName,
        source: SourceLocator,
        clock: &impl Clock,
    ) -> Result<&Entry, RegistryError> {
        if self.entries.contains(name.as_str()) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.entries.insert(Entry::new(name, source, clock))
    }

    /// Looks up an entry by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent.
    pub fn entry(&self, name: &str) -> Result<&Entry, RegistryError> {
        self.entries.get(name)
    }

    /// Replaces an entry's configuration with the parsed `text`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent and
    /// [`RegistryError::InvalidConfiguration`] when `text` is not a JSON
    /// object; in both cases the entry is unchanged.
    pub fn update_configuration(
        &mut self,
        name: &str,
        text: &str,
        clock: &impl Clock,
    ) -> Result<&Entry, RegistryError> {
        let entry = self.entries.get_mut(name)?;
        let configuration = EntryConfiguration::parse(text)?;
        entry.replace_configuration(configuration, clock);
        Ok(&*entry)
    }

    /// Records a health probe outcome for the entry installed at
    /// `installed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent, or when the name now
    /// belongs to a later installation than the one probed.
    pub fn record_health(
        &mut self,
        name: &str,
        installed_at: DateTime<Utc>,
        report: HealthReport,
        clock: &impl Clock,
    ) -> Result<&Entry, RegistryError> {
        let entry = self.entries.get_mut(name)?;
        if entry.created_at() != installed_at {
            return Err(RegistryError::NotFound(name.to_owned()));
        }
        entry.record_health(report, clock);
        Ok(&*entry)
    }

    /// Removes an entry and its membership in every group.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent; nothing is changed.
    pub fn remove_entry(
        &mut self,
        name: &str,
        clock: &impl Clock,
    ) -> Result<RemovedEntry, RegistryError> {
        let entry = self.entries.remove(name)?;
        let affected_groups = self.groups.cascade_remove(entry.name().as_str(), clock);
        Ok(RemovedEntry {
            entry,
            affected_groups,
        })
    }

    /// Deploys a group from currently installed entries.
    ///
    /// Repeated member names collapse to their first occurrence. The merged
    /// configuration folds each member's server definitions in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyMemberList`] when `member_names` is
    /// empty and [`RegistryError::UnknownMembers`] listing every name that
    /// is not installed. No group is created on error.
    pub fn deploy_group(
        &mut self,
        display_name: DisplayName,
        member_names: &[String],
        endpoint: Endpoint,
        clock: &impl Clock,
    ) -> Result<&Group, RegistryError> {
        if member_names.is_empty() {
            return Err(RegistryError::EmptyMemberList);
        }

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(member_names.len());
        let mut unknown = Vec::new();
        for raw_name in member_names {
            let name = raw_name.trim();
            if !seen.insert(name) {
                continue;
            }
            match self.entries.get(name) {
                Ok(entry) => members.push(entry.name().clone()),
                Err(_) => unknown.push(raw_name.clone()),
            }
        }
        if !unknown.is_empty() {
            return Err(RegistryError::UnknownMembers(unknown));
        }

        let configurations = members
            .iter()
            .map(|member| self.entries.get(member.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let merged = EntryConfiguration::merged(
            configurations.into_iter().map(Entry::configuration),
        );

        let group = Group::new(
            self.groups.next_id(),
            display_name,
            members,
            merged,
            endpoint,
            clock,
        );
        self.groups.insert(group)
    }

    /// Looks up a group by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GroupNotFound`] when absent.
    pub fn group(&self, id: GroupId) -> Result<&Group, RegistryError> {
        self.groups.get(id)
    }

    /// Captures the full registry state.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self.entries.iter().cloned().collect(),
            groups: self.groups.iter().cloned().collect(),
            next_group_id: self.groups.next_id(),
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InconsistentSnapshot`] when entry names
    /// repeat, group ids repeat or are out of order, `next_group_id` does
    /// not exceed every stored id, a group references a missing entry, or a
    /// group status disagrees with its membership.
    pub fn restore(snapshot: RegistrySnapshot) -> Result<Self, RegistryError> {
        let RegistrySnapshot {
            entries: stored_entries,
            groups: stored_groups,
            next_group_id,
        } = snapshot;

        let mut entries = EntryRegistry::new();
        for entry in stored_entries {
            entries.insert(entry).map_err(|err| {
                RegistryError::InconsistentSnapshot(err.to_string())
            })?;
        }

        let mut groups = IndexMap::with_capacity(stored_groups.len());
        let mut previous: Option<GroupId> = None;
        for group in stored_groups {
            check_group(&entries, &group, previous, next_group_id)?;
            previous = Some(group.id());
            groups.insert(group.id(), group);
        }

        Ok(Self {
            entries,
            groups: GroupRegistry::from_parts(groups, next_group_id),
        })
    }
}

fn check_group(
    entries: &EntryRegistry,
    group: &Group,
    previous: Option<GroupId>,
    next_group_id: GroupId,
) -> Result<(), RegistryError> {
    if previous.is_some_and(|earlier| earlier >= group.id()) {
        return Err(RegistryError::InconsistentSnapshot(format!(
            "group {} is out of issuance order",
            group.id()
        )));
    }
    if group.id() >= next_group_id {
        return Err(RegistryError::InconsistentSnapshot(format!(
            "group {} is not below next id {next_group_id}",
            group.id()
        )));
    }
    if let Some(missing) = group
        .members()
        .iter()
        .find(|member| !entries.contains(member.as_str()))
    {
        return Err(RegistryError::InconsistentSnapshot(format!(
            "group {} references missing entry '{missing}'",
            group.id()
        )));
    }
    let expected_status = if group.members().is_empty() {
        GroupStatus::Inactive
    } else {
        GroupStatus::Deployed
    };
    if group.status() != expected_status {
        return Err(RegistryError::InconsistentSnapshot(format!(
            "group {} is {} with {} members",
            group.id(),
            group.status(),
            group.members().len()
        )));
    }
    Ok(())
}
