//! Health probe port for checking installed entries.

use crate::registry::domain::{Entry, EntryName, HealthReport};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for health probe operations.
pub type HealthProbeResult<T> = Result<T, HealthProbeError>;

/// Liveness check for an installed entry.
///
/// Implementations receive a copy of the entry taken under the registry
/// lock; the lock is not held while the probe runs. Callers bound each
/// probe with a timeout.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Checks whether the entry is usable.
    ///
    /// An entry that was checked and found broken is reported as an
    /// unhealthy [`HealthReport`], not as an error.
    async fn probe(&self, entry: &Entry) -> HealthProbeResult<HealthReport>;
}

/// Errors returned when a probe cannot reach a verdict.
#[derive(Debug, Clone, Error)]
pub enum HealthProbeError {
    /// The probe is not able to check this entry.
    #[error("health probe cannot check entry '{name}': {reason}")]
    Unsupported {
        /// Entry name.
        name: EntryName,
        /// Reason string.
        reason: String,
    },

    /// Generic runtime failure.
    #[error("health probe runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl HealthProbeError {
    /// Wraps a runtime error from the probe adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
