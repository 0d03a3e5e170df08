//! In-memory health probe with scripted outcomes.

use crate::registry::{
    domain::{Entry, EntryName, HealthReport},
    ports::{HealthProbe, HealthProbeError, HealthProbeResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Health probe whose verdicts are set up front.
///
/// Every entry is healthy unless scripted otherwise. Suitable for unit and
/// integration tests and for running without touching the host system.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHealthProbe {
    state: Arc<RwLock<ScriptedProbeState>>,
}

#[derive(Debug, Default)]
struct ScriptedProbeState {
    unhealthy: HashMap<EntryName, String>,
    failures: HashMap<EntryName, String>,
    latency: HashMap<EntryName, Duration>,
}

impl ScriptedHealthProbe {
    /// Creates a probe that reports every entry healthy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `name` unhealthy with a diagnostic message.
    ///
    /// # Errors
    ///
    /// Returns probe runtime errors when lock acquisition fails.
    pub fn set_unhealthy(
        &self,
        name: EntryName,
        message: impl Into<String>,
    ) -> HealthProbeResult<()> {
        let text = message.into().trim().to_owned();
        let mut state = self.write_state()?;
        state.unhealthy.insert(name, text);
        Ok(())
    }

    /// Reports `name` healthy again, clearing any scripted failure.
    ///
    /// # Errors
    ///
    /// Returns probe runtime errors when lock acquisition fails.
    pub fn set_healthy(&self, name: &EntryName) -> HealthProbeResult<()> {
        let mut state = self.write_state()?;
        state.unhealthy.remove(name);
        state.failures.remove(name);
        Ok(())
    }

    /// Makes probing `name` fail without a verdict.
    ///
    /// # Errors
    ///
    /// Returns probe runtime errors when lock acquisition fails.
    pub fn set_failure(&self, name: EntryName, reason: impl Into<String>) -> HealthProbeResult<()> {
        let mut state = self.write_state()?;
        state.failures.insert(name, reason.into());
        Ok(())
    }

    /// Delays the verdict for `name`.
    ///
    /// # Errors
    ///
    /// Returns probe runtime errors when lock acquisition fails.
    pub fn set_latency(&self, name: EntryName, latency: Duration) -> HealthProbeResult<()> {
        let mut state = self.write_state()?;
        state.latency.insert(name, latency);
        Ok(())
    }

    fn write_state(
        &self,
    ) -> HealthProbeResult<std::sync::RwLockWriteGuard<'_, ScriptedProbeState>> {
        self.state
            .write()
            .map_err(|err| HealthProbeError::runtime(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl HealthProbe for ScriptedHealthProbe {
    async fn probe(&self, entry: &Entry) -> HealthProbeResult<HealthReport> {
        let (latency, failure, message) = {
            let state = self
                .state
                .read()
                .map_err(|err| HealthProbeError::runtime(std::io::Error::other(err.to_string())))?;
            (
                state.latency.get(entry.name()).copied(),
                state.failures.get(entry.name()).cloned(),
                state.unhealthy.get(entry.name()).cloned(),
            )
        };

        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        let verdict = message.map_or_else(HealthReport::healthy, HealthReport::unhealthy);
        failure.map_or(Ok(verdict), |reason| {
            Err(HealthProbeError::Unsupported {
                name: entry.name().clone(),
                reason,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::domain::SourceLocator;
    use mockable::DefaultClock;

    fn entry(name: &str) -> Entry {
        Entry::new(
            EntryName::new(name).expect("valid name"),
            SourceLocator::new("github.com/u/r").expect("valid locator"),
            &DefaultClock,
        )
    }

    #[tokio::test]
    async fn entries_are_healthy_by_default() {
        let probe = ScriptedHealthProbe::new();
        let report = probe
            .probe(&entry("alpha"))
            .await
            .expect("probe should run");
        assert!(report.is_healthy());
    }

    #[tokio::test]
    async fn scripted_outcomes_apply_per_entry() {
        let probe = ScriptedHealthProbe::new();
        let alpha = entry("alpha");
        probe
            .set_unhealthy(alpha.name().clone(), "port closed")
            .expect("script should apply");
        probe
            .set_failure(EntryName::new("beta").expect("valid name"), "no transport")
            .expect("script should apply");

        let report = probe.probe(&alpha).await.expect("probe should run");
        assert!(!report.is_healthy());
        assert_eq!(report.message(), Some("port closed"));

        assert!(matches!(
            probe.probe(&entry("beta")).await,
            Err(HealthProbeError::Unsupported { .. })
        ));

        probe
            .set_healthy(alpha.name())
            .expect("script should apply");
        let report = probe.probe(&alpha).await.expect("probe should run");
        assert!(report.is_healthy());
    }
}
