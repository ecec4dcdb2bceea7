use std::sync::Arc;

use anyhow::Result;
use calmirror_core::{CalendarGateway, SyncExecutor};
use calmirror_provider_google::GoogleGateway;

use crate::server_config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    executor: Arc<SyncExecutor>,
}

impl AppState {
    pub fn new(executor: SyncExecutor) -> Self {
        AppState {
            executor: Arc::new(executor),
        }
    }

    /// Executor talking to Google with the configured account and policies.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let gateway = GoogleGateway::new(config.google_account()?, config.provider_paths()?);
        Ok(Self::new(build_executor(config, Arc::new(gateway))))
    }

    pub fn executor(&self) -> &SyncExecutor {
        &self.executor
    }
}

pub fn build_executor(config: &ServerConfig, gateway: Arc<dyn CalendarGateway>) -> SyncExecutor {
    SyncExecutor::new(gateway)
        .with_policy(config.normalization_policy())
        .with_ownership(config.ownership)
        .with_retry_policy(config.retry_policy())
}
