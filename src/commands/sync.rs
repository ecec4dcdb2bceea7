use anyhow::Result;

use crate::commands::SyncArgs;
use crate::render::Render;
use crate::server_config::ServerConfig;
use crate::state::AppState;

pub async fn run(config: &ServerConfig, args: &SyncArgs) -> Result<()> {
    let sync_config = args.to_config()?;
    let state = AppState::from_config(config)?;

    let report = state.executor().run_with_retry(&sync_config).await?;
    println!("{}", report.render());

    Ok(())
}
