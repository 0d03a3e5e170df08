//! Text rendering of tool results.

use crate::registry::{
    domain::{Entry, EntryName, Group, HealthReport, RemovedEntry},
    services::ProbedEntry,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Sentence returned when no servers are installed.
pub const NO_SERVERS: &str =
    "No MCP servers installed yet. Use install_server to add servers.";

/// Sentence returned when no projects are deployed.
pub const NO_PROJECTS: &str =
    "No cloud projects deployed yet. Use deploy_project to create projects.";

/// Result of a tool call, as carried in a `tools/call` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    text: String,
    is_error: bool,
}

impl ToolOutput {
    /// Creates a successful result.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the call failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Builds the `tools/call` result object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "content": [{"type": "text", "text": self.text}],
            "isError": self.is_error
        })
    }
}

#[derive(Debug, Serialize)]
struct HealthSummary<'a> {
    verdict: &'static str,
    message: Option<&'a str>,
    checked_at: Option<DateTime<Utc>>,
}

impl<'a> HealthSummary<'a> {
    fn new(report: &'a HealthReport, checked_at: Option<DateTime<Utc>>) -> Self {
        Self {
            verdict: report.status().as_str(),
            message: report.message(),
            checked_at,
        }
    }
}

/// External view of an entry.
#[derive(Debug, Serialize)]
pub struct EntrySummary<'a> {
    name: &'a str,
    source_locator: &'a str,
    status: &'static str,
    configuration: Value,
    last_health: Option<HealthSummary<'a>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Entry> for EntrySummary<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            name: entry.name().as_str(),
            source_locator: entry.source().as_str(),
            status: entry.status().as_str(),
            configuration: entry.configuration().to_value(),
            last_health: entry
                .last_health()
                .map(|report| HealthSummary::new(report, entry.last_checked_at())),
            created_at: entry.created_at(),
            updated_at: entry.updated_at(),
        }
    }
}

/// External view of a group.
#[derive(Debug, Serialize)]
pub struct GroupSummary<'a> {
    id: String,
    name: &'a str,
    servers: Vec<&'a str>,
    status: &'static str,
    url: &'a str,
    configuration: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Group> for GroupSummary<'a> {
    fn from(group: &'a Group) -> Self {
        Self {
            id: group.id().to_string(),
            name: group.display_name().as_str(),
            servers: group.members().iter().map(EntryName::as_str).collect(),
            status: group.status().as_str(),
            url: group.endpoint().as_str(),
            configuration: group.merged_configuration().to_value(),
            created_at: group.created_at(),
            updated_at: group.updated_at(),
        }
    }
}

fn pretty(value: &impl Serialize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Renders one entry.
///
/// # Errors
///
/// Returns a serialization error if the summary cannot be encoded.
pub fn entry(entry: &Entry) -> serde_json::Result<String> {
    pretty(&EntrySummary::from(entry))
}

/// Renders the entry list, or [`NO_SERVERS`] when empty.
///
/// # Errors
///
/// Returns a serialization error if a summary cannot be encoded.
pub fn entries(entries: &[Entry]) -> serde_json::Result<String> {
    if entries.is_empty() {
        return Ok(NO_SERVERS.to_owned());
    }
    pretty(&entries.iter().map(EntrySummary::from).collect::<Vec<_>>())
}

/// Renders one group.
///
/// # Errors
///
/// Returns a serialization error if the summary cannot be encoded.
pub fn group(group: &Group) -> serde_json::Result<String> {
    pretty(&GroupSummary::from(group))
}

/// Renders the group list, or [`NO_PROJECTS`] when empty.
///
/// # Errors
///
/// Returns a serialization error if a summary cannot be encoded.
pub fn groups(groups: &[Group]) -> serde_json::Result<String> {
    if groups.is_empty() {
        return Ok(NO_PROJECTS.to_owned());
    }
    pretty(&groups.iter().map(GroupSummary::from).collect::<Vec<_>>())
}

/// Renders a health verdict together with the updated entry status.
///
/// # Errors
///
/// Returns a serialization error if the summary cannot be encoded.
pub fn probed(probed: &ProbedEntry) -> serde_json::Result<String> {
    pretty(&json!({
        "server": probed.entry.name().as_str(),
        "verdict": probed.report.status().as_str(),
        "message": probed.report.message(),
        "status": probed.entry.status().as_str(),
        "source_locator": probed.entry.source().as_str(),
        "checked_at": probed.entry.last_checked_at(),
    }))
}

/// Renders a removal confirmation.
///
/// # Errors
///
/// Returns a serialization error if the summary cannot be encoded.
pub fn removed(removed: &RemovedEntry) -> serde_json::Result<String> {
    let affected: Vec<String> = removed
        .affected_groups
        .iter()
        .map(ToString::to_string)
        .collect();
    pretty(&json!({
        "removed": removed.entry.name().as_str(),
        "affected_projects": affected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::domain::SourceLocator;
    use mockable::DefaultClock;

    fn sample_entry() -> Entry {
        Entry::new(
            EntryName::new("alpha").expect("valid name"),
            SourceLocator::new("github.com/u/a").expect("valid locator"),
            &DefaultClock,
        )
    }

    #[test]
    fn empty_lists_render_distinct_sentences() {
        assert_eq!(entries(&[]).expect("render"), NO_SERVERS);
        assert_eq!(groups(&[]).expect("render"), NO_PROJECTS);
        assert_ne!(NO_SERVERS, NO_PROJECTS);
    }

    #[test]
    fn entry_summary_is_pretty_json() {
        let text = entry(&sample_entry()).expect("render");
        let value: Value = serde_json::from_str(&text).expect("summary is JSON");

        assert!(text.contains('\n'));
        assert_eq!(value["name"], "alpha");
        assert_eq!(value["source_locator"], "github.com/u/a");
        assert_eq!(value["status"], "installed");
        assert_eq!(value["last_health"], Value::Null);
        assert_eq!(
            value["configuration"]["mcpServers"]["alpha"]["command"],
            "uv"
        );
    }

    #[test]
    fn outputs_carry_error_flag() {
        let value = ToolOutput::error("entry 'ghost' not found").to_value();

        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "entry 'ghost' not found");
        assert_eq!(ToolOutput::success("ok").to_value()["isError"], false);
    }
}
