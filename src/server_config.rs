//! Deployment configuration for the calmirror server and CLI.
//!
//! Layered with the `config` crate: built-in defaults, then
//! `<config_dir>/calmirror/config.toml`, then `CALMIRROR_*` environment
//! variables. Trigger parameters (calendars, prefix, filter) are never
//! read from here; they arrive with each request.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calmirror_core::normalize::NormalizationPolicy;
use calmirror_core::reconcile::Ownership;
use calmirror_core::retry::RetryPolicy;
use calmirror_provider_google::ProviderPaths;
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_retry_backoff() -> Vec<u64> {
    vec![2, 5]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Google account whose stored session is used for every call
    pub google_account: Option<String>,

    /// Directory holding `app_config.toml` and `session/`, e.g. a mounted secret
    pub secrets_dir: Option<PathBuf>,

    /// Delay before each retry of a failed run; its length is the retry count
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: Vec<u64>,

    #[serde(default)]
    pub ownership: Ownership,

    /// Blank the location of mirrored events instead of copying it
    #[serde(default)]
    pub clear_location: bool,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("calmirror");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template there on first run.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: ServerConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("CALMIRROR")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("retry_backoff_secs"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let contents = format!(
            "\
# calmirror configuration

# Address the HTTP trigger listens on:
# bind = \"{}\"

# Google account whose session is used:
# google_account = \"me@example.com\"

# Directory with app_config.toml and session/ (defaults to the config dir):
# secrets_dir = \"/run/secrets/calmirror\"

# Seconds to wait before each retry of a failed run:
# retry_backoff_secs = [2, 5]

# Which target events are managed: \"marker\" or \"prefix_substring\"
# ownership = \"marker\"

# Leave mirrored events without a location:
# clear_location = false

# \"text\" or \"json\"
# log_format = \"text\"
",
            DEFAULT_BIND
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Could not write {}", path.display()))?;

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind))
    }

    pub fn google_account(&self) -> Result<&str> {
        self.google_account.as_deref().context(
            "No Google account configured. Set google_account in config.toml or CALMIRROR_GOOGLE_ACCOUNT",
        )
    }

    pub fn provider_paths(&self) -> Result<ProviderPaths> {
        match &self.secrets_dir {
            Some(dir) => Ok(ProviderPaths::in_dir(dir)),
            None => ProviderPaths::default_location(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_secs(&self.retry_backoff_secs)
    }

    pub fn normalization_policy(&self) -> NormalizationPolicy {
        if self.clear_location {
            NormalizationPolicy::V1
        } else {
            NormalizationPolicy::CURRENT
        }
    }
}
