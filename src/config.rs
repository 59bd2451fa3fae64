use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub familysearch: FamilySearchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
}

/// Remote service endpoints and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct FamilySearchConfig {
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    #[serde(default = "default_platform_url")]
    pub platform_url: String,
    #[serde(default = "default_developer_key")]
    pub developer_key: String,
    /// Environment variable holding the account username
    #[serde(default = "default_username_env")]
    pub username_env: String,
    /// Environment variable holding the account password
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for FamilySearchConfig {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            platform_url: default_platform_url(),
            developer_key: default_developer_key(),
            username_env: default_username_env(),
            password_env: default_password_env(),
        }
    }
}

/// Fixed-interval retry for transient failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Default generation bounds (overridden by `-a` / `-d`)
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_ascend")]
    pub ascend: usize,
    #[serde(default = "default_descend")]
    pub descend: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            ascend: default_ascend(),
            descend: default_descend(),
        }
    }
}

fn default_identity_url() -> String {
    "https://api.familysearch.org/identity/v2".to_string()
}

fn default_platform_url() -> String {
    "https://familysearch.org/platform".to_string()
}

fn default_developer_key() -> String {
    "3Z3L-Z4GK-J7ZS-YT3Z-Q4KY-YN66-ZX5K-176R".to_string()
}

fn default_username_env() -> String {
    "FAMILYSEARCH_USERNAME".to_string()
}

fn default_password_env() -> String {
    "FAMILYSEARCH_PASSWORD".to_string()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_ascend() -> usize {
    4
}

fn default_descend() -> usize {
    1
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in GETMYANCESTORS_CONFIG environment variable (must exist)
    /// 2. ./getmyancestors.toml in current directory (built-in defaults if absent)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let (config_path, explicit) = match std::env::var("GETMYANCESTORS_CONFIG") {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from("getmyancestors.toml"), false),
        };

        if !explicit && !config_path.exists() {
            log::debug!("No {} found, using built-in defaults", config_path.display());
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        Url::parse(&self.familysearch.identity_url).with_context(|| {
            format!(
                "familysearch.identity_url is not a valid URL: {}",
                self.familysearch.identity_url
            )
        })?;

        Url::parse(&self.familysearch.platform_url).with_context(|| {
            format!(
                "familysearch.platform_url is not a valid URL: {}",
                self.familysearch.platform_url
            )
        })?;

        if self.familysearch.developer_key.trim().is_empty() {
            anyhow::bail!("familysearch.developer_key must not be empty");
        }

        if self.retry.interval_ms == 0 {
            anyhow::bail!("retry.interval_ms must be greater than 0");
        }

        if self.retry.request_timeout_secs == 0 {
            anyhow::bail!("retry.request_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Wait between two attempts of the same request
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry.interval_ms)
    }

    /// Per-request timeout handed to the HTTP client
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.retry.request_timeout_secs)
    }

    /// Username from the configured environment variable, if set
    pub fn username_from_env(&self) -> Option<String> {
        std::env::var(&self.familysearch.username_env).ok()
    }

    /// Password from the configured environment variable, if set
    pub fn password_from_env(&self) -> Option<String> {
        std::env::var(&self.familysearch.password_env).ok()
    }
}
