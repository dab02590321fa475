//! Terminal client entry point.
mod app;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use pet_content::{ConfigLoader, ContentFactory};
use runtime::{FileRepository, OracleManager, Runtime};

use crate::app::App;
use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.session_id.as_deref())?;

    let runtime = build_runtime(&config).await?;
    App::new(runtime).run().await
}

async fn build_runtime(config: &ClientConfig) -> Result<Runtime> {
    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir.clone()),
        None => ContentFactory::embedded(),
    };

    let mut sim = match &config.config_path {
        Some(path) => ConfigLoader::load(path),
        None => factory.load_config(),
    }
    .context("loading simulation config")?;
    if let Some(tick_interval_ms) = config.tick_interval_ms {
        sim = sim.with_tick_interval_ms(tick_interval_ms);
    }

    let oracles = OracleManager::load(&factory)?;
    let repository = FileRepository::new(&config.save_data_dir).with_context(|| {
        format!(
            "opening save directory {}",
            config.save_data_dir.display()
        )
    })?;

    tracing::info!(
        pet = %config.pet,
        save_dir = %config.save_data_dir.display(),
        tick_ms = sim.tick_interval_ms,
        "Starting session"
    );

    let runtime = Runtime::builder()
        .sim_config(sim)
        .oracles(oracles)
        .repository(Arc::new(repository))
        .load_or_create_pet(config.pet, config.profile.clone())
        .start_paused(config.start_paused)
        .build()
        .await?;

    Ok(runtime)
}
