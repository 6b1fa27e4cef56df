use crate::log_debug;

use anyhow::{Result, anyhow};
use dirs::{cache_dir, config_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration structure for the Repo-Atlas application
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How many times a transient failure is retried before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Cache retention window in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Cap on submodule nesting during resolution
    #[serde(default = "default_max_submodule_depth")]
    pub max_submodule_depth: usize,
    /// Whether submodules are resolved at all
    #[serde(default = "default_resolve_submodules")]
    pub resolve_submodules: bool,
    /// Whether to log HTTP traffic and external library output
    #[serde(default)]
    pub verbose_logging: bool,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

/// One hour, matching the cache retention window
fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_max_submodule_depth() -> usize {
    crate::github::DEFAULT_MAX_DEPTH
}

fn default_resolve_submodules() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_submodule_depth: default_max_submodule_depth(),
            resolve_submodules: default_resolve_submodules(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Load the configuration from the file
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let config = if config_path.exists() {
            let config_content = fs::read_to_string(&config_path)?;
            toml::from_str(&config_content)?
        } else {
            Self::default()
        };

        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Save the configuration to the file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        let config_content = toml::to_string(self)?;
        fs::write(config_path, config_content)?;
        log_debug!("Configuration saved: {:?}", self);
        Ok(())
    }

    /// Get the path to the configuration file
    fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("repo-atlas");
        fs::create_dir_all(&path)?;
        path.push("config.toml");
        Ok(path)
    }

    /// Where the cache snapshot lives
    pub fn cache_file_path() -> Result<PathBuf> {
        let mut path = cache_dir().ok_or_else(|| anyhow!("Unable to determine cache directory"))?;
        path.push("repo-atlas");
        path.push("cache.json");
        Ok(path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Update the configuration with new values, returning whether anything
    /// changed
    pub fn update(
        &mut self,
        api_url: Option<String>,
        timeout: Option<u64>,
        retries: Option<u32>,
        ttl: Option<u64>,
        max_depth: Option<usize>,
    ) -> bool {
        let mut changes_made = false;

        if let Some(api_url) = api_url
            && self.api_base_url != api_url
        {
            self.api_base_url = api_url;
            changes_made = true;
        }
        if let Some(timeout) = timeout
            && self.request_timeout_secs != timeout
        {
            self.request_timeout_secs = timeout;
            changes_made = true;
        }
        if let Some(retries) = retries
            && self.max_retries != retries
        {
            self.max_retries = retries;
            changes_made = true;
        }
        if let Some(ttl) = ttl
            && self.cache_ttl_secs != ttl
        {
            self.cache_ttl_secs = ttl;
            changes_made = true;
        }
        if let Some(max_depth) = max_depth
            && self.max_submodule_depth != max_depth
        {
            self.max_submodule_depth = max_depth;
            changes_made = true;
        }

        if changes_made {
            log_debug!("Configuration updated: {:?}", self);
        }
        changes_made
    }
}
