mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let state = build_state(&config).await?;

    scheduler::start_sync_scheduler(state.clone(), config.sync_interval);

    tokio::signal::ctrl_c().await?;
    if state.driver.is_updating() {
        tracing::warn!("Shutting down during a pass; committed batches are kept");
    }
    tracing::info!("Shutting down");
    Ok(())
}
