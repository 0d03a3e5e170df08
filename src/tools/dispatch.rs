//! Decodes tool arguments, runs registry operations and renders results.

use super::{
    catalog::{ToolName, UnknownToolError},
    render::{self, ToolOutput},
};
use crate::registry::{
    ports::HealthProbe,
    services::{RegistryService, RegistryServiceError},
};
use mockable::Clock;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Failures that cannot be reported as a tool result.
#[derive(Debug, Error)]
pub enum ToolDispatchError {
    /// The requested tool is not in the catalog.
    #[error(transparent)]
    UnknownTool(#[from] UnknownToolError),
    /// A result could not be rendered.
    #[error("failed to render tool result: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstallArguments {
    server_name: String,
    #[serde(alias = "repo_url")]
    source_locator: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeployArguments {
    project_name: String,
    server_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerArguments {
    server_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateArguments {
    server_name: String,
    new_config: String,
}

enum CallFailure {
    Arguments(String),
    Service(RegistryServiceError),
    Render(serde_json::Error),
}

impl From<RegistryServiceError> for CallFailure {
    fn from(error: RegistryServiceError) -> Self {
        Self::Service(error)
    }
}

impl From<serde_json::Error> for CallFailure {
    fn from(error: serde_json::Error) -> Self {
        Self::Render(error)
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, CallFailure> {
    let document = match arguments {
        Value::Null => serde_json::Map::new(),
        Value::Object(fields) => fields,
        _ => {
            return Err(CallFailure::Arguments(format!(
                "invalid arguments for {tool}: expected an object"
            )));
        }
    };
    serde_json::from_value(Value::Object(document))
        .map_err(|err| CallFailure::Arguments(format!("invalid arguments for {tool}: {err}")))
}

/// Routes `tools/call` requests to a [`RegistryService`].
pub struct ToolDispatcher<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    service: RegistryService<P, C>,
}

impl<P, C> ToolDispatcher<P, C>
where
    P: HealthProbe,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher over `service`.
    #[must_use]
    pub const fn new(service: RegistryService<P, C>) -> Self {
        Self { service }
    }

    /// Returns the underlying service.
    #[must_use]
    pub const fn service(&self) -> &RegistryService<P, C> {
        &self.service
    }

    /// Runs the named tool.
    ///
    /// Registry errors and malformed arguments are returned as error
    /// outputs rather than `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDispatchError::UnknownTool`] for names outside the
    /// catalog and [`ToolDispatchError::Render`] if a result cannot be
    /// encoded.
    pub async fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolOutput, ToolDispatchError> {
        let tool = ToolName::try_from(name)?;
        debug!(tool = %tool, "dispatching tool call");
        match self.run(tool, arguments).await {
            Ok(text) => Ok(ToolOutput::success(text)),
            Err(CallFailure::Arguments(message)) => {
                warn!(tool = %tool, reason = %message, "rejected tool arguments");
                Ok(ToolOutput::error(message))
            }
            Err(CallFailure::Service(err)) => Ok(ToolOutput::error(err.to_string())),
            Err(CallFailure::Render(err)) => Err(ToolDispatchError::Render(err)),
        }
    }

    async fn run(&self, tool: ToolName, arguments: Value) -> Result<String, CallFailure> {
        let text = match tool {
            ToolName::InstallServer => {
                let args: InstallArguments = decode(tool, arguments)?;
                render::entry(
                    &self
                        .service
                        .install(&args.server_name, &args.source_locator)?,
                )?
            }
            ToolName::ListServers => render::entries(&self.service.list_entries()?)?,
            ToolName::DeployProject => {
                let args: DeployArguments = decode(tool, arguments)?;
                render::group(
                    &self
                        .service
                        .deploy_group(&args.project_name, &args.server_names)?,
                )?
            }
            ToolName::CheckServerHealth => {
                let args: ServerArguments = decode(tool, arguments)?;
                render::probed(&self.service.probe_health(&args.server_name).await?)?
            }
            ToolName::UpdateServerConfig => {
                let args: UpdateArguments = decode(tool, arguments)?;
                render::entry(
                    &self
                        .service
                        .update_configuration(&args.server_name, &args.new_config)?,
                )?
            }
            ToolName::ListProjects => render::groups(&self.service.list_groups()?)?,
            ToolName::RemoveServer => {
                let args: ServerArguments = decode(tool, arguments)?;
                render::removed(&self.service.remove_entry(&args.server_name)?)?
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::adapters::ScriptedHealthProbe;
    use crate::tools::render::{NO_PROJECTS, NO_SERVERS};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    type Dispatcher = ToolDispatcher<ScriptedHealthProbe, DefaultClock>;

    #[fixture]
    fn dispatcher() -> Dispatcher {
        ToolDispatcher::new(RegistryService::new(
            Arc::new(ScriptedHealthProbe::new()),
            Arc::new(DefaultClock),
        ))
    }

    fn parse(output: &ToolOutput) -> Value {
        serde_json::from_str(output.text()).expect("output should be JSON")
    }

    #[rstest]
    #[tokio::test]
    async fn install_accepts_repo_url_alias(dispatcher: Dispatcher) {
        let output = dispatcher
            .call(
                "install_server",
                json!({"server_name": "alpha", "repo_url": "https://github.com/u/a"}),
            )
            .await
            .expect("dispatch should succeed");

        assert!(!output.is_error());
        assert_eq!(parse(&output)["source_locator"], "https://github.com/u/a");
    }

    #[rstest]
    #[tokio::test]
    async fn legacy_tool_names_run_the_same_operations(dispatcher: Dispatcher) {
        let installed = dispatcher
            .call(
                "install_server_from_github",
                json!({"repo_url": "https://github.com/u/a", "server_name": "alpha"}),
            )
            .await
            .expect("dispatch should succeed");
        let deployed = dispatcher
            .call(
                "deploy_to_fastmcp_cloud",
                json!({"project_name": "proj1", "server_names": ["alpha"]}),
            )
            .await
            .expect("dispatch should succeed");
        let servers = dispatcher
            .call("list_installed_servers", json!({}))
            .await
            .expect("dispatch should succeed");
        let projects = dispatcher
            .call("list_cloud_projects", json!({}))
            .await
            .expect("dispatch should succeed");

        assert!(!installed.is_error());
        assert_eq!(parse(&deployed)["id"], "project_1");
        assert_eq!(parse(&servers)[0]["name"], "alpha");
        assert_eq!(parse(&projects)[0]["servers"], json!(["alpha"]));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_lists_render_sentences(dispatcher: Dispatcher) {
        let servers = dispatcher
            .call("list_servers", Value::Null)
            .await
            .expect("dispatch should succeed");
        let projects = dispatcher
            .call("list_projects", json!({}))
            .await
            .expect("dispatch should succeed");

        assert_eq!(servers.text(), NO_SERVERS);
        assert_eq!(projects.text(), NO_PROJECTS);
    }

    #[rstest]
    #[case(json!({"server_name": "alpha"}))]
    #[case(json!({"server_name": 7, "source_locator": "github.com/u/a"}))]
    #[case(json!({"server_name": "alpha", "source_locator": "x", "extra": true}))]
    #[tokio::test]
    async fn malformed_arguments_are_error_outputs(
        dispatcher: Dispatcher,
        #[case] arguments: Value,
    ) {
        let output = dispatcher
            .call("install_server", arguments)
            .await
            .expect("dispatch should succeed");

        assert!(output.is_error());
        assert!(
            output
                .text()
                .starts_with("invalid arguments for install_server")
        );
    }

    #[rstest]
    #[case(json!(["alpha", "github.com/u/a"]))]
    #[case(json!("alpha"))]
    #[case(json!(42))]
    #[tokio::test]
    async fn positional_arguments_install_nothing(
        dispatcher: Dispatcher,
        #[case] arguments: Value,
    ) {
        let output = dispatcher
            .call("install_server", arguments)
            .await
            .expect("dispatch should succeed");

        assert!(output.is_error());
        assert_eq!(
            output.text(),
            "invalid arguments for install_server: expected an object"
        );
        assert!(
            dispatcher
                .service()
                .list_entries()
                .expect("listing should succeed")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tool_is_a_dispatch_error(dispatcher: Dispatcher) {
        assert!(matches!(
            dispatcher
                .call("install_server_from_gitlab", json!({}))
                .await,
            Err(ToolDispatchError::UnknownTool(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn deploy_with_unknown_members_reports_every_name(dispatcher: Dispatcher) {
        dispatcher
            .call(
                "install_server",
                json!({"server_name": "alpha", "source_locator": "github.com/u/a"}),
            )
            .await
            .expect("dispatch should succeed");

        let output = dispatcher
            .call(
                "deploy_project",
                json!({"project_name": "Proj", "server_names": ["ghost", "alpha", "phantom"]}),
            )
            .await
            .expect("dispatch should succeed");

        assert!(output.is_error());
        assert_eq!(output.text(), "unknown entries: ghost, phantom");
    }

    #[rstest]
    #[tokio::test]
    async fn remove_reports_affected_projects(dispatcher: Dispatcher) {
        for name in ["alpha", "beta"] {
            dispatcher
                .call(
                    "install_server",
                    json!({"server_name": name, "source_locator": format!("github.com/u/{name}")}),
                )
                .await
                .expect("dispatch should succeed");
        }
        let deployed = dispatcher
            .call(
                "deploy_project",
                json!({"project_name": "Team Tools", "server_names": ["alpha", "beta"]}),
            )
            .await
            .expect("dispatch should succeed");
        assert_eq!(parse(&deployed)["url"], "https://team-tools.fastmcp.app");

        let removed = dispatcher
            .call("remove_server", json!({"server_name": "alpha"}))
            .await
            .expect("dispatch should succeed");

        assert_eq!(
            parse(&removed),
            json!({"removed": "alpha", "affected_projects": ["project_1"]})
        );
    }

    #[rstest]
    #[tokio::test]
    async fn health_check_reports_verdict_and_status(dispatcher: Dispatcher) {
        dispatcher
            .call(
                "install_server",
                json!({"server_name": "alpha", "source_locator": "github.com/u/a"}),
            )
            .await
            .expect("dispatch should succeed");

        let output = dispatcher
            .call("check_server_health", json!({"server_name": "alpha"}))
            .await
            .expect("dispatch should succeed");

        let value = parse(&output);
        assert_eq!(value["verdict"], "healthy");
        assert_eq!(value["status"], "healthy");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_configuration_is_an_error_output(dispatcher: Dispatcher) {
        dispatcher
            .call(
                "install_server",
                json!({"server_name": "alpha", "source_locator": "github.com/u/a"}),
            )
            .await
            .expect("dispatch should succeed");

        let output = dispatcher
            .call(
                "update_server_config",
                json!({"server_name": "alpha", "new_config": "{not valid json"}),
            )
            .await
            .expect("dispatch should succeed");

        assert!(output.is_error());
        assert!(output.text().starts_with("invalid configuration"));
    }
}
