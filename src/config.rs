//! Runtime configuration for the hangar server.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `hangar.toml` in the working directory
//! 3. The file named by `HANGAR_CONFIG_PATH`
//! 4. `HANGAR_`-prefixed environment variables, with `__` separating
//!    nested keys (e.g. `HANGAR_HEALTH__TIMEOUT=2s`)

use crate::registry::services::{
    DEFAULT_ENDPOINT_TEMPLATE, DEFAULT_PROBE_TIMEOUT, EndpointTemplate, EndpointTemplateError,
};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "hangar.toml";

/// Environment variable naming an extra configuration file.
pub const CONFIG_PATH_ENV: &str = "HANGAR_CONFIG_PATH";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "HANGAR_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or extracted.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    /// The endpoint template does not render.
    #[error(transparent)]
    EndpointTemplate(#[from] EndpointTemplateError),

    /// The health probe timeout is zero.
    #[error("health probe timeout must be greater than zero")]
    ZeroProbeTimeout,
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Load(Box::new(error))
    }
}

/// Health probe implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthProbeKind {
    /// Resolve each entry's launch command on the host.
    #[default]
    Command,
    /// Report scripted verdicts; every entry is healthy.
    Scripted,
}

/// Health probing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Probe implementation.
    pub probe: HealthProbeKind,
    /// Upper bound on a single probe.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe: HealthProbeKind::default(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarConfig {
    /// `minijinja` template for group endpoints; sees `slug` and `name`.
    pub endpoint_template: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Health probing settings.
    pub health: HealthConfig,
}

impl Default for HangarConfig {
    fn default() -> Self {
        Self {
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_owned(),
            log_filter: "info".to_owned(),
            health: HealthConfig::default(),
        }
    }
}

impl HangarConfig {
    /// Loads configuration from the default file, the optional
    /// `HANGAR_CONFIG_PATH` file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or the result
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Toml::file(DEFAULT_CONFIG_FILE));
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(&figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Loads configuration from one TOML file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is malformed or the result
    /// fails validation. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::extract(&Figment::new().merge(Toml::file(path.as_ref())))
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the endpoint template does not render
    /// or the probe timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_template()?;
        if self.health.timeout.is_zero() {
            return Err(ConfigError::ZeroProbeTimeout);
        }
        Ok(())
    }

    /// Builds the configured endpoint template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EndpointTemplate`] when it does not render.
    pub fn endpoint_template(&self) -> Result<EndpointTemplate, ConfigError> {
        Ok(EndpointTemplate::new(self.endpoint_template.as_str())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temporary config file");
        file.write_all(contents.as_bytes())
            .expect("write config file");
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let config = HangarConfig::from_file(directory.path().join("absent.toml"))
            .expect("defaults should load");
        assert_eq!(config, HangarConfig::default());
        assert_eq!(config.health.timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
endpoint_template = "https://{{ slug }}.apps.example.com"

[health]
probe = "scripted"
timeout = "250ms"
"#,
        );

        let config = HangarConfig::from_file(file.path()).expect("config should load");

        assert_eq!(config.endpoint_template, "https://{{ slug }}.apps.example.com");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.health.probe, HealthProbeKind::Scripted);
        assert_eq!(config.health.timeout, Duration::from_millis(250));
    }

    #[test]
    fn malformed_endpoint_template_is_rejected() {
        let file = write_config(r#"endpoint_template = "https://{{ slug""#);

        assert!(matches!(
            HangarConfig::from_file(file.path()),
            Err(ConfigError::EndpointTemplate(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = write_config("[health]\ntimeout = \"0s\"\n");

        assert!(matches!(
            HangarConfig::from_file(file.path()),
            Err(ConfigError::ZeroProbeTimeout)
        ));
    }

    #[test]
    fn unknown_probe_kind_fails_to_load() {
        let file = write_config("[health]\nprobe = \"random\"\n");

        assert!(matches!(
            HangarConfig::from_file(file.path()),
            Err(ConfigError::Load(_))
        ));
    }
}
