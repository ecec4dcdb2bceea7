//! Core of the calmirror ecosystem.
//!
//! This crate holds everything that decides *what* has to change in a
//! target calendar, independent of any calendar provider:
//! - `event` for the provider-neutral event model
//! - `normalize` for turning source events into their mirrored shape
//! - `reconcile` for diffing normalized source events against the target
//! - `sync` for driving a plan through a `gateway::CalendarGateway`

pub mod config;
pub mod error;
pub mod event;
pub mod gateway;
pub mod normalize;
pub mod reconcile;
pub mod retry;
pub mod sync;

// Re-export the types most callers need at crate root for convenience
pub use config::SyncConfig;
pub use error::{CalMirrorError, CalMirrorResult};
pub use event::*;
pub use gateway::{CalendarGateway, CalendarRef};
pub use sync::{SyncExecutor, SyncReport};
