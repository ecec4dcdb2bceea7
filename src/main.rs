mod commands;
mod render;
mod routes;
mod server_config;
mod state;

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::SyncArgs;
use crate::server_config::{LogFormat, ServerConfig};

#[derive(Parser)]
#[command(name = "calmirror")]
#[command(about = "Mirror the future events of one Google calendar into another")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP trigger server
    Serve {
        /// Listen address, overriding `bind` from config.toml
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Run one sync now, with retries
    Sync(SyncArgs),
    /// Show what a sync would change
    Plan(SyncArgs),
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load()?;

    init_tracing(config.log_format);

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(&config, bind).await,
        Commands::Sync(args) => commands::sync::run(&config, &args).await,
        Commands::Plan(args) => commands::plan::run(&config, &args).await,
    }
}
