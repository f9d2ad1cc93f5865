//! Centralized configuration management for sms-console

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Default SMS API host used when `SMS_BASE_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "http://47.129.223.178:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the SMS API
    pub api_base_url: String,
    /// Base URL of a remote auth endpoint; the in-process check is used when unset
    pub auth_url: Option<String>,
    /// Path to the SQLite file backing the local store
    pub state_db_path: PathBuf,
    /// Directory for exported CSV files
    pub export_dir: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Terminal UI configuration
    pub ui: UiConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds; requests never time out when unset
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

/// Terminal UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// How long a notification stays on screen (milliseconds)
    pub toast_duration_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 4000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_url: None,
            state_db_path: "./sms-console.db".into(),
            export_dir: "./exports".into(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("SMS_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let auth_url = std::env::var("SMS_AUTH_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let state_db_path = std::env::var("SMS_CONSOLE_STATE_DB")
            .unwrap_or_else(|_| "./sms-console.db".to_string())
            .into();

        let export_dir = std::env::var("SMS_CONSOLE_EXPORT_DIR")
            .unwrap_or_else(|_| "./exports".to_string())
            .into();

        let http = HttpConfig {
            timeout_seconds: parse_env_var("SMS_CONSOLE_HTTP_TIMEOUT_SECONDS")?,
            user_agent: std::env::var("SMS_CONSOLE_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
        };

        let ui = UiConfig {
            toast_duration_ms: parse_env_var("SMS_CONSOLE_TOAST_MS")?.unwrap_or(4000),
        };

        Ok(Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.map(|url| url.trim_end_matches('/').to_string()),
            state_db_path,
            export_dir,
            http,
            ui,
        })
    }

    /// Get HTTP timeout as Duration, if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    /// Get notification lifetime as Duration
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.toast_duration_ms)
    }

    /// Build the shared HTTP client from the configured settings
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.http.user_agent.clone());
        if let Some(timeout) = self.http_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "SMS API base URL must start with http:// or https://: {}",
                self.api_base_url
            ));
        }

        if let Some(parent) = self.state_db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "State database parent directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("sms-console/{}", env!("CARGO_PKG_VERSION"))
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
