//! Insertion-ordered group registry with sequential identifiers.

use super::{Group, GroupId, RegistryError};
use indexmap::IndexMap;
use mockable::Clock;

/// Mapping from group identifier to group, in deployment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRegistry {
    groups: IndexMap<GroupId, Group>,
    next_id: GroupId,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: IndexMap::new(),
            next_id: GroupId::FIRST,
        }
    }
}

impl GroupRegistry {
    /// Creates an empty group registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier the next deployed group will receive.
    #[must_use]
    pub const fn next_id(&self) -> GroupId {
        self.next_id
    }

    /// Stores a group built around [`Self::next_id`] and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InconsistentSnapshot`] when the group does not
    /// carry the next identifier; identifiers are only ever issued in order.
    pub fn insert(&mut self, group: Group) -> Result<&Group, RegistryError> {
        if group.id() != self.next_id {
            return Err(RegistryError::InconsistentSnapshot(format!(
                "group {} inserted out of order (expected {})",
                group.id(),
                self.next_id
            )));
        }

        self.next_id = self.next_id.successor();
        Ok(&*self.groups.entry(group.id()).or_insert(group))
    }

    /// Looks up a group by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GroupNotFound`] when no group has the id.
    pub fn get(&self, id: GroupId) -> Result<&Group, RegistryError> {
        self.groups.get(&id).ok_or(RegistryError::GroupNotFound(id))
    }

    /// Iterates groups in deployment order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Removes `entry_name` from every group that references it.
    ///
    /// Visits each group exactly once and never fails. Returns the ids of
    /// the groups whose membership changed.
    pub fn cascade_remove(&mut self, entry_name: &str, clock: &impl Clock) -> Vec<GroupId> {
        self.groups
            .values_mut()
            .filter_map(|group| group.remove_member(entry_name, clock).then_some(group.id()))
            .collect()
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns whether the registry holds no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(super) const fn from_parts(groups: IndexMap<GroupId, Group>, next_id: GroupId) -> Self {
        Self { groups, next_id }
    }
}
