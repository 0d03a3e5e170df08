//! Service layer for entry and group registry operations.

use crate::registry::{
    domain::{
        DisplayName, Entry, EntryName, Group, GroupId, HealthReport, Registry, RegistryDomainError,
        RegistryError, RemovedEntry, SourceLocator,
    },
    ports::HealthProbe,
    services::{EndpointTemplate, EndpointTemplateError},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Probe timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum RegistryServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
    /// The registry rejected the operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The group endpoint could not be rendered.
    #[error(transparent)]
    Endpoint(#[from] EndpointTemplateError),
    /// The shared registry state is unusable after a panic.
    #[error("registry state unavailable: {0}")]
    StateUnavailable(String),
}

/// Result type for registry service operations.
pub type RegistryServiceResult<T> = Result<T, RegistryServiceError>;

/// Outcome of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedEntry {
    /// The entry after its status was updated.
    pub entry: Entry,
    /// The verdict that was recorded.
    pub report: HealthReport,
}

impl ProbedEntry {
    /// Returns whether the entry was found healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.report.is_healthy()
    }
}

/// Registry orchestration service.
///
/// Both registries sit behind one lock that is held for the whole of each
/// operation, except while a health probe is running. Clones share that
/// state.
pub struct RegistryService<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    state: Arc<Mutex<Registry>>,
    probe: Arc<P>,
    clock: Arc<C>,
    endpoint_template: EndpointTemplate,
    probe_timeout: Duration,
}

impl<P, C> Clone for RegistryService<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            probe: Arc::clone(&self.probe),
            clock: Arc::clone(&self.clock),
            endpoint_template: self.endpoint_template.clone(),
            probe_timeout: self.probe_timeout,
        }
    }
}

impl<P, C> RegistryService<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    /// Creates a service over an empty registry.
    #[must_use]
    pub fn new(probe: Arc<P>, clock: Arc<C>) -> Self {
        Self::with_registry(Registry::new(), probe, clock)
    }

    /// Creates a service over existing registry state.
    #[must_use]
    pub fn with_registry(registry: Registry, probe: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(Mutex::new(registry)),
            probe,
            clock,
            endpoint_template: EndpointTemplate::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the template used to derive group endpoints.
    #[must_use]
    pub fn with_endpoint_template(mut self, endpoint_template: EndpointTemplate) -> Self {
        self.endpoint_template = endpoint_template;
        self
    }

    /// Sets the upper bound on a single health probe.
    #[must_use]
    pub const fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    fn lock(&self) -> RegistryServiceResult<MutexGuard<'_, Registry>> {
        self.state
            .lock()
            .map_err(|err| RegistryServiceError::StateUnavailable(err.to_string()))
    }

    /// Installs a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] for invalid names or
    /// locators and [`RegistryError::DuplicateName`] when the name is taken.
    pub fn install(&self, name: &str, source_locator: &str) -> RegistryServiceResult<Entry> {
        let entry_name = EntryName::new(name)?;
        let source = SourceLocator::new(source_locator)?;

        let mut registry = self.lock()?;
        let entry = registry
            .install(entry_name, source, &*self.clock)
            .inspect_err(|err| warn!(entry = name, error = %err, "install rejected"))?
            .clone();
        info!(entry = %entry.name(), source = %entry.source(), "installed entry");
        Ok(entry)
    }

    /// Returns one entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent.
    pub fn entry(&self, name: &str) -> RegistryServiceResult<Entry> {
        Ok(self.lock()?.entry(name.trim())?.clone())
    }

    /// Lists entries in installation order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::StateUnavailable`] when the state
    /// lock is poisoned.
    pub fn list_entries(&self) -> RegistryServiceResult<Vec<Entry>> {
        Ok(self.lock()?.entries().iter().cloned().collect())
    }

    /// Replaces an entry's configuration with JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent and
    /// [`RegistryError::InvalidConfiguration`] for malformed text.
    pub fn update_configuration(
        &self,
        name: &str,
        configuration_json: &str,
    ) -> RegistryServiceResult<Entry> {
        let mut registry = self.lock()?;
        let entry = registry
            .update_configuration(name.trim(), configuration_json, &*self.clock)
            .inspect_err(|err| warn!(entry = name, error = %err, "configuration update rejected"))?
            .clone();
        info!(entry = %entry.name(), "replaced entry configuration");
        Ok(entry)
    }

    /// Probes an entry and records the verdict.
    ///
    /// The registry lock is released while the probe runs. A probe that
    /// fails or exceeds the timeout is recorded as unhealthy.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the entry is absent, either
    /// before probing or because it was removed (or removed and reinstalled)
    /// while the probe ran.
    pub async fn probe_health(&self, name: &str) -> RegistryServiceResult<ProbedEntry> {
        let entry_name = name.trim();
        let snapshot = self.entry(entry_name)?;

        let probed = tokio::time::timeout(self.probe_timeout, self.probe.probe(&snapshot)).await;
        let report = match probed {
            Ok(Ok(report)) => report,
            Ok(Err(err)) => {
                warn!(entry = entry_name, error = %err, "health probe failed");
                HealthReport::unhealthy(err.to_string())
            }
            Err(_) => {
                warn!(entry = entry_name, timeout = ?self.probe_timeout, "health probe timed out");
                HealthReport::unhealthy(format!(
                    "health probe timed out after {}ms",
                    self.probe_timeout.as_millis()
                ))
            }
        };

        let mut registry = self.lock()?;
        let entry = registry
            .record_health(
                entry_name,
                snapshot.created_at(),
                report.clone(),
                &*self.clock,
            )?
            .clone();
        info!(entry = entry_name, verdict = %report.status(), "recorded health verdict");
        Ok(ProbedEntry { entry, report })
    }

    /// Removes an entry and its membership in every group.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent.
    pub fn remove_entry(&self, name: &str) -> RegistryServiceResult<RemovedEntry> {
        let mut registry = self.lock()?;
        let removed = registry.remove_entry(name.trim(), &*self.clock)?;
        info!(entry = %removed.entry.name(), "removed entry");
        for group_id in &removed.affected_groups {
            debug!(entry = %removed.entry.name(), group = %group_id, "dropped group membership");
        }
        Ok(removed)
    }

    /// Deploys a group from installed entries.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] for a blank display name,
    /// [`RegistryError::EmptyMemberList`] or [`RegistryError::UnknownMembers`]
    /// for bad membership, and [`RegistryServiceError::Endpoint`] when the
    /// endpoint cannot be rendered. Nothing is created on error.
    pub fn deploy_group(
        &self,
        display_name: &str,
        member_names: &[String],
    ) -> RegistryServiceResult<Group> {
        let group_name = DisplayName::new(display_name)?;
        let endpoint = self.endpoint_template.render(&group_name)?;

        let mut registry = self.lock()?;
        let group = registry
            .deploy_group(group_name, member_names, endpoint, &*self.clock)
            .inspect_err(|err| warn!(error = %err, "group deployment rejected"))?
            .clone();
        info!(
            group = %group.id(),
            name = %group.display_name(),
            endpoint = %group.endpoint(),
            members = group.members().len(),
            "deployed group"
        );
        Ok(group)
    }

    /// Returns one group.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GroupNotFound`] when absent.
    pub fn group(&self, id: GroupId) -> RegistryServiceResult<Group> {
        Ok(self.lock()?.group(id)?.clone())
    }

    /// Lists groups in deployment order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::StateUnavailable`] when the state
    /// lock is poisoned.
    pub fn list_groups(&self) -> RegistryServiceResult<Vec<Group>> {
        Ok(self.lock()?.groups().iter().cloned().collect())
    }

    /// Returns a copy of the whole registry state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::StateUnavailable`] when the state
    /// lock is poisoned.
    pub fn registry(&self) -> RegistryServiceResult<Registry> {
        Ok(self.lock()?.clone())
    }
}
