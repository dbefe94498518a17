//! Configuration handling for codestart.
//! Loads the first configuration file found in a directory (JSON or YAML),
//! then applies environment overrides for the GitHub credentials.

use crate::constants::{
    CONFIG_FILES, CONFIRM_ATTEMPTS, CONFIRM_DELAY, GITHUB_API_URL, GITHUB_OAUTH_URL, USER_AGENT,
};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `github.client_id`
pub const ENV_CLIENT_ID: &str = "CODESTART_GITHUB_CLIENT_ID";
/// Environment variable overriding `github.client_secret`
pub const ENV_CLIENT_SECRET: &str = "CODESTART_GITHUB_CLIENT_SECRET";

/// GitHub integration settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub oauth_url: String,
    pub api_url: String,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            oauth_url: GITHUB_OAUTH_URL.to_string(),
            api_url: GITHUB_API_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "xxxxxxxxxx"))
            .field("oauth_url", &self.oauth_url)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GitHubConfig {
    /// Publishing is enabled only when both client id and secret are set.
    pub fn is_enabled(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.client_id) && set(&self.client_secret)
    }

    /// Returns `(client_id, client_secret)`.
    ///
    /// # Errors
    /// * `Error::Configuration` if the integration is disabled
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if self.is_enabled() => Ok((id.as_str(), secret.as_str())),
            _ => Err(Error::Configuration("GitHub is not enabled".to_string())),
        }
    }

    /// Logs whether the integration is enabled, masking the secret.
    pub fn log_status(&self) {
        if self.is_enabled() {
            info!(
                "GitHub is enabled: clientId = {}, clientSecret = xxxxxxxxxx",
                self.client_id.as_deref().unwrap_or_default()
            );
        } else {
            info!("GitHub is disabled");
        }
    }
}

/// Settings of the repository confirmation poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub confirm_attempts: u32,
    pub confirm_delay_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            confirm_attempts: CONFIRM_ATTEMPTS,
            confirm_delay_ms: CONFIRM_DELAY.as_millis() as u64,
        }
    }
}

impl PublishConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.confirm_attempts, Duration::from_millis(self.confirm_delay_ms))
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub publish: PublishConfig,
    /// Directory holding a replacement Maven wrapper bundle
    pub assets_dir: Option<PathBuf>,
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::Configuration` if the content is neither valid JSON nor YAML,
///   or if the values are out of range
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = match serde_json::from_str(content) {
        Ok(config) => config,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Invalid configuration format: {}", e)))?,
    };
    if config.publish.confirm_attempts == 0 {
        return Err(Error::Configuration(
            "publish.confirm_attempts must be at least 1".to_string(),
        ));
    }
    Ok(config)
}

/// Applies environment overrides from the given lookup.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(id) = lookup(ENV_CLIENT_ID) {
        config.github.client_id = Some(id);
    }
    if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
        config.github.client_secret = Some(secret);
    }
    config
}

/// Loads configuration from a directory, trying `codestart.json`,
/// `codestart.yml` and `codestart.yaml` in that order. Defaults are used when
/// none exists. Environment overrides are applied last.
///
/// # Arguments
/// * `dir` - Directory containing the configuration file
///
/// # Returns
/// * `Result<Config>` - Loaded configuration
pub fn load_config<P: AsRef<Path>>(dir: P) -> Result<Config> {
    let mut config = None;
    for file in CONFIG_FILES {
        let config_path = dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            config = Some(parse_config(&content)?);
            break;
        }
    }

    let config = config.unwrap_or_else(|| {
        debug!("No configuration file found (tried: {})", CONFIG_FILES.join(", "));
        Config::default()
    });
    Ok(apply_overrides(config, |key| std::env::var(key).ok()))
}
