//! Installed entry record.

use super::{EntryConfiguration, EntryName, EntryStatus, HealthReport, SourceLocator};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An installed server: name, provenance, configuration and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    name: EntryName,
    source: SourceLocator,
    configuration: EntryConfiguration,
    status: EntryStatus,
    last_health: Option<HealthReport>,
    last_checked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entry {
    /// Creates an `installed` entry with the synthesized default configuration.
    #[must_use]
    pub fn new(name: EntryName, source: SourceLocator, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let configuration = EntryConfiguration::default_for(&name, &source);
        Self {
            name,
            source,
            configuration,
            status: EntryStatus::Installed,
            last_health: None,
            last_checked_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the entry name.
    #[must_use]
    pub const fn name(&self) -> &EntryName {
        &self.name
    }

    /// Returns where the entry was installed from.
    #[must_use]
    pub const fn source(&self) -> &SourceLocator {
        &self.source
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn configuration(&self) -> &EntryConfiguration {
        &self.configuration
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> EntryStatus {
        self.status
    }

    /// Returns the most recent health report.
    #[must_use]
    pub const fn last_health(&self) -> Option<&HealthReport> {
        self.last_health.as_ref()
    }

    /// Returns when the entry was last probed.
    #[must_use]
    pub const fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the configuration wholesale and marks the entry `updated`.
    pub fn replace_configuration(&mut self, configuration: EntryConfiguration, clock: &impl Clock) {
        self.configuration = configuration;
        self.status = EntryStatus::Updated;
        self.touch(clock);
    }

    /// Records a probe outcome, moving the entry to `healthy` or `error`.
    pub fn record_health(&mut self, report: HealthReport, clock: &impl Clock) {
        self.status = if report.is_healthy() {
            EntryStatus::Healthy
        } else {
            EntryStatus::Error
        };
        self.last_health = Some(report);
        self.last_checked_at = Some(clock.utc());
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use serde_json::json;

    fn build_entry(clock: &DefaultClock) -> Entry {
        Entry::new(
            EntryName::new("alpha").expect("valid name"),
            SourceLocator::new("github.com/u/r").expect("valid locator"),
            clock,
        )
    }

    #[test]
    fn new_entry_is_installed_and_unprobed() {
        let entry = build_entry(&DefaultClock);

        assert_eq!(entry.status(), EntryStatus::Installed);
        assert!(entry.last_health().is_none());
        assert!(entry.configuration().server_definition("alpha").is_some());
    }

    #[test]
    fn replace_configuration_discards_previous_document() {
        let clock = DefaultClock;
        let mut entry = build_entry(&clock);
        let replacement =
            EntryConfiguration::parse(r#"{"only": "this"}"#).expect("valid configuration");

        entry.replace_configuration(replacement, &clock);

        assert_eq!(entry.configuration().to_value(), json!({"only": "this"}));
        assert_eq!(entry.status(), EntryStatus::Updated);
    }

    #[test]
    fn record_health_maps_verdict_to_status() {
        let clock = DefaultClock;
        let mut entry = build_entry(&clock);

        entry.record_health(HealthReport::unhealthy("command missing"), &clock);
        assert_eq!(entry.status(), EntryStatus::Error);
        assert_eq!(
            entry.last_health().and_then(HealthReport::message),
            Some("command missing")
        );
        assert!(entry.last_checked_at().is_some());

        entry.record_health(HealthReport::healthy(), &clock);
        assert_eq!(entry.status(), EntryStatus::Healthy);
    }
}
