pub mod plan;
pub mod serve;
pub mod sync;

use calmirror_core::{CalMirrorResult, SyncConfig};
use clap::Args;

/// The trigger parameters, as command-line flags.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Calendar to copy events from
    #[arg(long)]
    pub source: String,

    /// Calendar to mirror events into
    #[arg(long)]
    pub target: String,

    /// Tag prepended to every mirrored summary
    #[arg(long)]
    pub prefix: String,

    /// Skip source events whose summary matches this pattern (case-insensitive)
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Skip private source events
    #[arg(long)]
    pub public_only: bool,
}

impl SyncArgs {
    pub fn to_config(&self) -> CalMirrorResult<SyncConfig> {
        SyncConfig::new(
            &self.source,
            &self.target,
            &self.prefix,
            &self.filter,
            self.public_only,
        )
    }
}
