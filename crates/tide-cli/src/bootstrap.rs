//! Configuration loading and pipeline composition.
//!
//! The CLI owns the lifecycles: it opens the read-only store, builds the
//! model client, and injects both into the orchestrator. Nothing downstream
//! reaches for globals.

use anyhow::Context;
use tide_config::TideConfig;
use tide_model::ModelClient;
use tide_pipeline::{Orchestrator, PipelineOptions};
use tide_store::Store;

pub fn load_config() -> anyhow::Result<TideConfig> {
    let config = TideConfig::load_with_dotenv().context("failed to load configuration")?;
    if !config.model.is_configured() {
        tracing::warn!(
            "no model API key configured (set TIDEPOOL_MODEL__API_KEY or [model] api_key); \
             model calls will fail"
        );
    }
    Ok(config)
}

pub fn open_store(config: &TideConfig) -> anyhow::Result<Store> {
    Store::open_read_only(&config.store.db_path, config.store.max_rows).with_context(|| {
        format!(
            "failed to open lake database at '{}'",
            config.store.db_path
        )
    })
}

pub fn build_pipeline(config: &TideConfig) -> anyhow::Result<Orchestrator<ModelClient>> {
    let store = open_store(config)?;
    let model = ModelClient::new(config.model.clone());
    Ok(Orchestrator::new(
        store,
        model,
        PipelineOptions::from(&config.general),
    ))
}
