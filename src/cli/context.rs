//! Shared command setup: config loading, logging, pipeline construction.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hubcast::hub::HttpHub;
use hubcast::identity::FileSignerProvider;
use hubcast::message::{AccountId, Network};
use hubcast::pipeline::ActionPipeline;

use super::config::{default_config_path, HubcastConfig};

/// User ID the file-backed signer provider serves. The CLI is a
/// single-operator tool; multi-user deployments bring their own provider.
pub const OPERATOR_USER: &str = "operator";

/// Everything a command needs to act against the configured hub.
pub struct ActionContext {
    pub pipeline: ActionPipeline,
    pub hub: Arc<HttpHub>,
}

/// Initialize tracing from the configured log level.
///
/// `RUST_LOG` overrides the config when set. Safe to call once per process.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// Load config and build the pipeline for a command.
pub fn load(
    config_path: Option<String>,
) -> Result<(HubcastConfig, ActionContext), Box<dyn std::error::Error>> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let config = HubcastConfig::load(&path)?;
    init_logging(&config.logging.level);

    let network: Network = config.hub.network.parse()?;
    let hub = Arc::new(HttpHub::new(&config.hub.url));
    let signers = Arc::new(FileSignerProvider::load(
        OPERATOR_USER,
        &config.signer.key_file,
        config.signer.account_id.map(AccountId),
    )?);

    let pipeline = ActionPipeline::new(
        signers,
        hub.clone(),
        hub.clone(),
        hub.clone(),
        hub.clone(),
        network,
    );

    Ok((config, ActionContext { pipeline, hub }))
}
