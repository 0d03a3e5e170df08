//! Port contracts for registry orchestration.

mod health;

pub use health::{HealthProbe, HealthProbeError, HealthProbeResult};
