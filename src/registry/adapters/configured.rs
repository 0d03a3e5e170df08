//! Health probe selected from configuration.

use crate::config::HealthProbeKind;
use crate::registry::{
    adapters::{CommandHealthProbe, ScriptedHealthProbe},
    domain::{Entry, HealthReport},
    ports::{HealthProbe, HealthProbeResult},
};
use async_trait::async_trait;

/// Runtime choice between the available probe adapters.
#[derive(Debug, Clone)]
pub enum ConfiguredHealthProbe {
    /// Resolves launch commands on the host.
    Command(CommandHealthProbe),
    /// Reports scripted verdicts, healthy by default.
    Scripted(ScriptedHealthProbe),
}

impl ConfiguredHealthProbe {
    /// Builds the probe named by `kind`.
    #[must_use]
    pub fn from_kind(kind: HealthProbeKind) -> Self {
        match kind {
            HealthProbeKind::Command => Self::Command(CommandHealthProbe::new()),
            HealthProbeKind::Scripted => Self::Scripted(ScriptedHealthProbe::new()),
        }
    }
}

#[async_trait]
impl HealthProbe for ConfiguredHealthProbe {
    async fn probe(&self, entry: &Entry) -> HealthProbeResult<HealthReport> {
        match self {
            Self::Command(probe) => probe.probe(entry).await,
            Self::Scripted(probe) => probe.probe(entry).await,
        }
    }
}
