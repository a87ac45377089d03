//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::BackendConfig;
use crate::render::PageOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendSection,

    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub preferences: PreferencesSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl BackendSection {
    pub fn client_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// Dashboard host configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

fn default_toast_duration() -> u64 {
    3000
}

fn default_refresh_interval() -> u64 {
    1000
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            toast_duration_ms: default_toast_duration(),
            refresh_interval_ms: default_refresh_interval(),
        }
    }
}

impl DashboardSection {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            interactive: true,
            refresh_interval_ms: self.refresh_interval_ms,
        }
    }
}

/// Where UI preferences (the theme) are persisted
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesSection {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

fn default_preferences_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("crm-dashboard")
                .join("preferences.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./crm-dashboard-preferences.json".to_string())
}

impl Default for PreferencesSection {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("crm_dashboard={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("crm-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("CRM_DASHBOARD_BACKEND_URL") {
            self.backend.base_url = url;
        }

        if let Some(host) = var("CRM_DASHBOARD_HOST") {
            self.dashboard.host = host;
        }
        if let Some(port) = var("CRM_DASHBOARD_PORT") {
            match port.parse() {
                Ok(p) => self.dashboard.port = p,
                Err(_) => tracing::warn!("Ignoring invalid CRM_DASHBOARD_PORT: {}", port),
            }
        }

        if let Some(path) = var("CRM_DASHBOARD_PREFERENCES") {
            self.preferences.path = path;
        }

        if let Some(level) = var("CRM_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CRM_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# CRM Dashboard Configuration
#
# Environment variables override these settings:
# - CRM_DASHBOARD_BACKEND_URL
# - CRM_DASHBOARD_HOST
# - CRM_DASHBOARD_PORT
# - CRM_DASHBOARD_PREFERENCES
# - CRM_DASHBOARD_LOG_LEVEL
# - CRM_DASHBOARD_LOG_FORMAT

[backend]
# Analytics backend API root
base_url = "http://localhost:8000/api"

# TCP connect timeout (seconds); requests themselves are not timed out
connect_timeout_secs = 10

[dashboard]
# Dashboard host bind address
host = "127.0.0.1"
port = 8084

# How long the PDF confirmation stays visible (ms)
toast_duration_ms = 3000

# Page reload delay while a request is in flight (ms)
refresh_interval_ms = 1000

[preferences]
# JSON file holding the theme preference
# path = "~/.local/share/crm-dashboard/preferences.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
