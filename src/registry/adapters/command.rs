//! Health probe that resolves an entry's launch command on the host.

use crate::registry::{
    domain::{Entry, HealthReport},
    ports::{HealthProbe, HealthProbeResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Checks that the command an entry is launched with exists and is runnable.
///
/// The command is read from the entry's own server definition
/// (`mcpServers.<name>.command`). Bare command names are searched along the
/// search path; anything containing a path separator is checked directly.
#[derive(Debug, Clone, Default)]
pub struct CommandHealthProbe {
    search_path: Option<OsString>,
}

impl CommandHealthProbe {
    /// Creates a probe that searches the process `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `search_path` instead of the process `PATH`.
    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    async fn resolve(&self, command: &str) -> Option<PathBuf> {
        let candidate = Path::new(command);
        if candidate.components().count() > 1 || candidate.is_absolute() {
            return is_executable(candidate)
                .await
                .then(|| candidate.to_path_buf());
        }

        let search_path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;
        for directory in std::env::split_paths(&search_path) {
            if directory.as_os_str().is_empty() {
                continue;
            }
            let resolved = directory.join(command);
            if is_executable(&resolved).await {
                return Some(resolved);
            }
        }
        None
    }
}

#[async_trait]
impl HealthProbe for CommandHealthProbe {
    async fn probe(&self, entry: &Entry) -> HealthProbeResult<HealthReport> {
        let Some(definition) = entry
            .configuration()
            .server_definition(entry.name().as_str())
        else {
            return Ok(HealthReport::unhealthy(format!(
                "no server definition for '{}'",
                entry.name()
            )));
        };

        if definition.get("disabled").and_then(Value::as_bool) == Some(true) {
            return Ok(HealthReport::unhealthy("server definition is disabled"));
        }

        let Some(command) = definition
            .get("command")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|command| !command.is_empty())
        else {
            return Ok(HealthReport::unhealthy("server definition has no command"));
        };

        let resolved = self.resolve(command).await;
        Ok(resolved.map_or_else(
            || HealthReport::unhealthy(format!("command '{command}' was not found")),
            |path| {
                HealthReport::healthy()
                    .with_message(format!("'{command}' resolved to {}", path.display()))
            },
        ))
    }
}

async fn is_executable(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file() && has_execute_permission(&metadata))
}

#[cfg(unix)]
fn has_execute_permission(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
const fn has_execute_permission(_metadata: &std::fs::Metadata) -> bool {
    true
}
