//! App-level configuration for the Google provider.
//!
//! User-provided OAuth credentials stored at:
//!   <base>/app_config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the provider keeps its credentials and sessions.
#[derive(Debug, Clone)]
pub struct ProviderPaths {
    base: PathBuf,
}

impl ProviderPaths {
    /// `<config_dir>/calmirror/providers/google`
    pub fn default_location() -> Result<Self> {
        Ok(ProviderPaths {
            base: dirs::config_dir()
                .context("Could not determine config directory")?
                .join("calmirror")
                .join("providers")
                .join("google"),
        })
    }

    /// Relocate everything under a mounted secrets directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        ProviderPaths { base: dir.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn app_config(&self) -> PathBuf {
        self.base.join("app_config.toml")
    }

    pub fn session(&self, account_email: &str) -> PathBuf {
        let email_slug = account_email.replace(['/', '\\', ':'], "_");
        self.base.join("session").join(format!("{}.toml", email_slug))
    }
}

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    pub fn load(paths: &ProviderPaths) -> Result<Self> {
        let path = paths.app_config();

        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found.\n\n\
                Create {} with:\n\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                See https://console.cloud.google.com/apis/credentials for setup.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;

        Ok(config)
    }
}
