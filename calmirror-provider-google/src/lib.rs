//! Google Calendar gateway for calmirror.
//!
//! Talks to the Calendar v3 REST API with an OAuth session stored on disk:
//!   <config_dir>/calmirror/providers/google/app_config.toml
//!   <config_dir>/calmirror/providers/google/session/{account}.toml
//!
//! Obtaining the first session (the browser consent flow) is not handled
//! here; the session file must already exist.

mod app_config;
mod gateway;
mod google_event;
mod session;

pub use app_config::{AppConfig, ProviderPaths};
pub use gateway::GoogleGateway;
pub use session::Session;
