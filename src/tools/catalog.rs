//! Names and input schemas of the tools the server advertises.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

/// Error returned when a tool name is not in the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tool: {0}")]
pub struct UnknownToolError(pub String);

/// Tools exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Install a server entry.
    InstallServer,
    /// List installed servers.
    ListServers,
    /// Deploy servers together as a project.
    DeployProject,
    /// Probe a server's health.
    CheckServerHealth,
    /// Replace a server's configuration.
    UpdateServerConfig,
    /// List deployed projects.
    ListProjects,
    /// Remove a server and its project memberships.
    RemoveServer,
}

impl ToolName {
    /// Every tool, in the order they are advertised.
    pub const ALL: [Self; 7] = [
        Self::InstallServer,
        Self::ListServers,
        Self::DeployProject,
        Self::CheckServerHealth,
        Self::UpdateServerConfig,
        Self::ListProjects,
        Self::RemoveServer,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstallServer => "install_server",
            Self::ListServers => "list_servers",
            Self::DeployProject => "deploy_project",
            Self::CheckServerHealth => "check_server_health",
            Self::UpdateServerConfig => "update_server_config",
            Self::ListProjects => "list_projects",
            Self::RemoveServer => "remove_server",
        }
    }

    /// Returns the earlier wire name still accepted for this tool, if any.
    #[must_use]
    pub const fn legacy_name(self) -> Option<&'static str> {
        match self {
            Self::InstallServer => Some("install_server_from_github"),
            Self::ListServers => Some("list_installed_servers"),
            Self::DeployProject => Some("deploy_to_fastmcp_cloud"),
            Self::ListProjects => Some("list_cloud_projects"),
            Self::CheckServerHealth | Self::UpdateServerConfig | Self::RemoveServer => None,
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::InstallServer => {
                "Install an MCP server from a source locator such as a GitHub repository URL."
            }
            Self::ListServers => "List installed MCP servers with their status and configuration.",
            Self::DeployProject => {
                "Deploy installed servers together as a cloud project with a merged configuration."
            }
            Self::CheckServerHealth => {
                "Check the health of an installed server and record the verdict."
            }
            Self::UpdateServerConfig => {
                "Replace the configuration of an installed server with a JSON object."
            }
            Self::ListProjects => "List deployed cloud projects.",
            Self::RemoveServer => {
                "Remove an installed server and drop it from every project that includes it."
            }
        }
    }

    fn input_schema(self) -> Value {
        let server_name = json!({
            "type": "string",
            "description": "Name of the server entry"
        });
        match self {
            Self::InstallServer => object_schema(
                &json!({
                    "server_name": server_name,
                    "source_locator": {
                        "type": "string",
                        "description": "Server origin, e.g. https://github.com/user/repo"
                    }
                }),
                &["server_name", "source_locator"],
            ),
            Self::DeployProject => object_schema(
                &json!({
                    "project_name": {
                        "type": "string",
                        "description": "Display name of the project"
                    },
                    "server_names": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Installed servers to include, in order"
                    }
                }),
                &["project_name", "server_names"],
            ),
            Self::CheckServerHealth | Self::RemoveServer => {
                object_schema(&json!({ "server_name": server_name }), &["server_name"])
            }
            Self::UpdateServerConfig => object_schema(
                &json!({
                    "server_name": server_name,
                    "new_config": {
                        "type": "string",
                        "description": "Replacement configuration as JSON object text"
                    }
                }),
                &["server_name", "new_config"],
            ),
            Self::ListServers | Self::ListProjects => object_schema(&json!({}), &[]),
        }
    }

    /// Builds the advertised definition for this tool.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

fn object_schema(properties: &Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ToolName {
    type Error = UnknownToolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value || tool.legacy_name() == Some(value))
            .ok_or_else(|| UnknownToolError(value.to_owned()))
    }
}

/// Tool metadata as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
}

impl ToolDefinition {
    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description
    }

    /// Returns the JSON schema of the tool arguments.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// Returns the definitions of every tool.
#[must_use]
pub fn catalog() -> Vec<ToolDefinition> {
    ToolName::ALL
        .into_iter()
        .map(ToolName::definition)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("install_server", ToolName::InstallServer)]
    #[case("list_servers", ToolName::ListServers)]
    #[case("deploy_project", ToolName::DeployProject)]
    #[case("check_server_health", ToolName::CheckServerHealth)]
    #[case("update_server_config", ToolName::UpdateServerConfig)]
    #[case("list_projects", ToolName::ListProjects)]
    #[case("remove_server", ToolName::RemoveServer)]
    fn tool_names_parse(#[case] raw: &str, #[case] expected: ToolName) {
        assert_eq!(ToolName::try_from(raw), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("install_server_from_github", ToolName::InstallServer)]
    #[case("list_installed_servers", ToolName::ListServers)]
    #[case("deploy_to_fastmcp_cloud", ToolName::DeployProject)]
    #[case("list_cloud_projects", ToolName::ListProjects)]
    fn legacy_tool_names_resolve(#[case] raw: &str, #[case] expected: ToolName) {
        assert_eq!(ToolName::try_from(raw), Ok(expected));
        assert_ne!(expected.as_str(), raw);
    }

    #[test]
    fn legacy_names_are_not_advertised() {
        let definitions = catalog();
        let advertised: Vec<&str> = definitions.iter().map(ToolDefinition::name).collect();

        for legacy in ToolName::ALL.into_iter().filter_map(ToolName::legacy_name) {
            assert!(!advertised.contains(&legacy), "{legacy} is advertised");
        }
    }

    #[test]
    fn unknown_tool_name_is_rejected() {
        assert_eq!(
            ToolName::try_from("install_server_from_gitlab"),
            Err(UnknownToolError("install_server_from_gitlab".to_owned()))
        );
    }

    #[test]
    fn catalog_lists_every_tool_once() {
        let definitions = catalog();
        let names: Vec<&str> = definitions.iter().map(ToolDefinition::name).collect();

        assert_eq!(
            names,
            [
                "install_server",
                "list_servers",
                "deploy_project",
                "check_server_health",
                "update_server_config",
                "list_projects",
                "remove_server",
            ]
        );
    }

    #[test]
    fn definitions_serialize_with_camel_case_schema_key() {
        let value = serde_json::to_value(ToolName::RemoveServer.definition())
            .expect("definition should serialize");

        assert_eq!(value["name"], "remove_server");
        assert_eq!(value["inputSchema"]["type"], "object");
        assert_eq!(value["inputSchema"]["required"], json!(["server_name"]));
    }
}
