use anyhow::Result;

use crate::commands::SyncArgs;
use crate::render::Render;
use crate::server_config::ServerConfig;
use crate::state::AppState;

/// Show what a sync would change without writing anything.
pub async fn run(config: &ServerConfig, args: &SyncArgs) -> Result<()> {
    let sync_config = args.to_config()?;
    let state = AppState::from_config(config)?;

    let (target, plan) = state.executor().plan(&sync_config).await?;

    println!("{} → {}", sync_config.source_calendar, target.name);
    println!("{}", plan.render());

    Ok(())
}
