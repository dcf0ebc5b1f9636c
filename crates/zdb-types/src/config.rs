//! Configuration loading for the Zeebe DB monitor.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/zeebe-db-monitor/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::MonitorError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the Zeebe runtime RocksDB directory (opened read-only)
    #[serde(default = "default_runtime_dir")]
    pub runtime_dir: String,

    /// Metrics HTTP listener host
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    /// Metrics HTTP listener port
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Value of the `db_name` label on every exported gauge
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// How long an aggregate is served from cache before the store is rescanned
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_runtime_dir() -> String {
    "./runtime".to_string()
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    9464
}

fn default_db_name() -> String {
    "runtime".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            runtime_dir: default_runtime_dir(),
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            db_name: default_db_name(),
            cache_ttl_secs: default_cache_ttl_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/zeebe-db-monitor/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (ZDB_MONITOR__*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, MonitorError> {
        let config_dir = ProjectDirs::from("", "", "zeebe-db-monitor")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("runtime_dir", default_runtime_dir())
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .set_default("listen_host", default_listen_host())
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .set_default("listen_port", default_listen_port() as i64)
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .set_default("db_name", default_db_name())
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .set_default("cache_ttl_secs", default_cache_ttl_secs() as i64)
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| MonitorError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: ZDB_MONITOR__RUNTIME_DIR, ZDB_MONITOR__CACHE_TTL_SECS, etc.
        // Double underscore so field names keep their single underscores.
        builder = builder.add_source(
            Environment::with_prefix("ZDB_MONITOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| MonitorError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| MonitorError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.cache_ttl_secs == 0 {
            return Err(MonitorError::Config("cache_ttl_secs must be > 0".to_string()));
        }
        if self.db_name.trim().is_empty() {
            return Err(MonitorError::Config("db_name must not be empty".to_string()));
        }
        if self.runtime_dir.trim().is_empty() {
            return Err(MonitorError::Config("runtime_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Socket address string for the metrics listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Expand ~ in runtime_dir to the home directory
    pub fn expanded_runtime_dir(&self) -> PathBuf {
        if let Some(rest) = self.runtime_dir.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.runtime_dir)
    }
}
