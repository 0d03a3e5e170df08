//! Domain model for server entries, deployed groups and their registries.
//!
//! Values are validated on construction. The [`Registry`] owns both
//! collections so that operations touching entries and groups together
//! observe one consistent state.

mod configuration;
mod entries;
mod entry;
mod error;
mod group;
mod groups;
mod health;
mod ids;
mod registry;
mod status;

pub use configuration::{EntryConfiguration, SERVER_DEFINITIONS_KEY};
pub use entries::EntryRegistry;
pub use entry::Entry;
pub use error::{
    ParseEntryStatusError, ParseGroupIdError, ParseGroupStatusError, RegistryDomainError,
    RegistryError,
};
pub use group::{Endpoint, Group};
pub use groups::GroupRegistry;
pub use health::{HealthReport, HealthStatus};
pub use ids::{DisplayName, EntryName, GroupId, SourceLocator};
pub use registry::{Registry, RegistrySnapshot, RemovedEntry};
pub use status::{EntryStatus, GroupStatus};
