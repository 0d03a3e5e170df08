//! Serves the hangar registry tools over stdio.
//!
//! Usage:
//!
//! ```text
//! hangar
//! ```
//!
//! JSON-RPC requests are read line by line from stdin and responses are
//! written to stdout. Logs go to stderr. Configuration is read from
//! `hangar.toml`, the file named by `HANGAR_CONFIG_PATH` and `HANGAR_*`
//! environment variables; `RUST_LOG` overrides the configured log filter.

use hangar::config::HangarConfig;
use hangar::registry::adapters::ConfiguredHealthProbe;
use hangar::registry::services::RegistryService;
use hangar::server::ToolServer;
use hangar::tools::ToolDispatcher;
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let config = HangarConfig::load()?;
    init_tracing(&config.log_filter)?;

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(&config))
}

fn init_tracing(fallback_filter: &str) -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_default_env()
        .map_or_else(|_| EnvFilter::try_new(fallback_filter), Ok)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
}

async fn run(config: &HangarConfig) -> Result<(), BoxError> {
    let endpoint_template = config.endpoint_template()?;
    info!(
        probe = ?config.health.probe,
        timeout = ?config.health.timeout,
        endpoint_template = endpoint_template.source(),
        "starting hangar"
    );

    let service = RegistryService::new(
        Arc::new(ConfiguredHealthProbe::from_kind(config.health.probe)),
        Arc::new(DefaultClock),
    )
    .with_endpoint_template(endpoint_template)
    .with_probe_timeout(config.health.timeout);
    let server = ToolServer::new(ToolDispatcher::new(service));

    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}
