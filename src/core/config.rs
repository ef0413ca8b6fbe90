//! Configuration management for the CloudSense harness
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: `$CLOUDSENSE_CONFIG`, else
//! ~/.config/cloudsense/config.toml. Files ending in `.json` are read as JSON
//! so an existing `test-config.json` can be pointed at directly.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{CloudSenseError, Result};
use crate::wait::RetryPolicy;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "CLOUDSENSE_CONFIG";

/// Instance used when neither the org nor the environment provides one
pub const DEFAULT_INSTANCE_URL: &str = "https://login.salesforce.com";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target org and URL layout
    #[serde(default)]
    pub salesforce: SalesforceConfig,
    /// `sf` CLI invocation
    #[serde(default)]
    pub sf: SfCliConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Polling and retry timings
    #[serde(default)]
    pub wait: WaitConfig,
    /// Expected CloudSense UI
    #[serde(default)]
    pub cloudsense: CloudSenseConfig,
}

/// Target org configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesforceConfig {
    /// Alias of a pre-authenticated `sf` org
    #[serde(alias = "orgAlias")]
    pub org_alias: String,
    /// Instance base URL, e.g. https://acme.my.salesforce.com
    #[serde(alias = "instanceUrl")]
    pub instance_url: Option<String>,
    /// Lightning app path appended to the instance URL
    #[serde(alias = "lightningUrl")]
    pub lightning_url: String,
}

/// `sf` CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SfCliConfig {
    /// Binary name or path
    pub binary: String,
    /// Value passed to `--loglevel`
    pub loglevel: String,
    /// Working directory for CLI calls (the sfdx project)
    pub project_path: Option<PathBuf>,
    /// Instance used for frontdoor URLs when org display has none
    pub fallback_instance_url: String,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Binary name or path of agent-browser
    pub binary: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
}

/// Convergence timings, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// How long to wait for spinners to clear
    pub spinner_timeout_ms: u64,
    /// How long to wait for the Lightning shell to show
    pub page_ready_timeout_ms: u64,
    /// Interval between predicate evaluations
    pub poll_interval_ms: u64,
    /// Attempts made by `retry_action`
    pub retry_attempts: u32,
    /// Sleep between retry attempts
    pub retry_backoff_ms: u64,
}

/// Expected CloudSense UI state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSenseConfig {
    /// App name `verify` looks for in the Lightning context bar
    #[serde(alias = "appName")]
    pub app_name: String,
}

impl Default for SalesforceConfig {
    fn default() -> Self {
        Self {
            org_alias: env::var("SF_TARGET_ORG").unwrap_or_else(|_| "cloudsense".to_string()),
            instance_url: env::var("SF_INSTANCE_URL").ok(),
            lightning_url: "/lightning/page/home".to_string(),
        }
    }
}

impl Default for SfCliConfig {
    fn default() -> Self {
        Self {
            binary: "sf".to_string(),
            loglevel: "fatal".to_string(),
            project_path: None,
            fallback_instance_url: env::var("SF_INSTANCE_URL")
                .unwrap_or_else(|_| DEFAULT_INSTANCE_URL.to_string()),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: "agent-browser".to_string(),
            session_name: env::var("CLOUDSENSE_BROWSER_SESSION")
                .unwrap_or_else(|_| "cloudsense".to_string()),
            headed: env::var("CLOUDSENSE_BROWSER_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            spinner_timeout_ms: 10_000,
            page_ready_timeout_ms: 30_000,
            poll_interval_ms: 250,
            retry_attempts: 3,
            retry_backoff_ms: 1_000,
        }
    }
}

impl Default for CloudSenseConfig {
    fn default() -> Self {
        Self {
            app_name: "CloudSense Solution Management".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cloudsense")
    }

    /// Get the config file path, honouring `CLOUDSENSE_CONFIG`
    pub fn config_file() -> PathBuf {
        env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"))
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        match Self::load_from_path(&Self::config_file()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(error = %e, "no usable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CloudSenseError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CloudSenseError::config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content, path)
    }

    /// Parse config content, choosing the format by file extension
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };

        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CloudSenseError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Instance URL configured for page navigation, if any
    pub fn instance_url(&self) -> Option<&str> {
        self.salesforce
            .instance_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
    }

    /// Absolute URL of the Lightning app page
    pub fn lightning_url(&self) -> Option<String> {
        self.instance_url()
            .map(|base| format!("{}{}", base, self.salesforce.lightning_url))
    }

    /// Spinner wait timeout
    pub fn spinner_timeout(&self) -> Duration {
        Duration::from_millis(self.wait.spinner_timeout_ms)
    }

    /// Page readiness timeout
    pub fn page_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.wait.page_ready_timeout_ms)
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.wait.poll_interval_ms)
    }

    /// Retry policy built from the wait section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.wait.retry_attempts,
            Duration::from_millis(self.wait.retry_backoff_ms),
        )
    }

    /// Set the target org alias
    pub fn set_org_alias(&mut self, alias: impl Into<String>) {
        self.salesforce.org_alias = alias.into();
    }
}
