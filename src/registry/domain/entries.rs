//! Insertion-ordered entry registry.

use super::{Entry, EntryName, RegistryError};
use indexmap::{IndexMap, map::Entry as Slot};

/// Mapping from entry name to entry, in installation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRegistry {
    entries: IndexMap<EntryName, Entry>,
}

impl EntryRegistry {
    /// Creates an empty entry registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] when the name is taken. The
    /// existing entry is left untouched.
    pub fn insert(&mut self, entry: Entry) -> Result<&Entry, RegistryError> {
        match self.entries.entry(entry.name().clone()) {
            Slot::Occupied(occupied) => Err(RegistryError::DuplicateName(occupied.key().clone())),
            Slot::Vacant(vacant) => Ok(&*vacant.insert(entry)),
        }
    }

    /// Looks up an entry by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no entry has the name.
    pub fn get(&self, name: &str) -> Result<&Entry, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    /// Looks up an entry by name for in-place mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no entry has the name.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Entry, RegistryError> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    /// Returns whether an entry with the name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates entries in installation order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Removes an entry, keeping the order of the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no entry has the name.
    pub fn remove(&mut self, name: &str) -> Result<Entry, RegistryError> {
        self.entries
            .shift_remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
