pub mod paths;

use crate::error::config::ConfigError;
use crate::{DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT};

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

pub const ENV_HOST: &str = "RECEIVER_HOST";
pub const ENV_PORT: &str = "RECEIVER_PORT";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "RECEIVER_IDLE_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "RECEIVER_LOG_LEVEL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Close a connection after this many seconds without a frame. `None` waits forever.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a plain-text log file under the platform data directory.
    #[serde(default)]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
        }
    }
}

impl LoggingConfig {
    /// Parsed level filter. Falls back to `Info` if the level was never validated.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub listen: ListenConfig,

    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            listen: ListenConfig::default(),
            connection: ConnectionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_LISTEN_PORT
}
fn default_log_level() -> String {
    "info".to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ReceiverConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file does not exist.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable, corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        if config_dir.exists() && !config_dir.is_dir() {
            return Err(ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
                path: config_dir.to_path_buf(),
            });
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ReceiverConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// Uses temp file + rename so a crash never leaves a half-written config.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.listen.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "listen.host cannot be empty".to_string(),
            });
        }

        if self.listen.port == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "listen.port must be non-zero".to_string(),
            });
        }

        if self.connection.idle_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "connection.idle_timeout_secs must be non-zero when set".to_string(),
            });
        }

        if LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid log level: {}", self.logging.level),
            });
        }

        Ok(())
    }

    /// Overlay values from `RECEIVER_*` environment variables.
    ///
    /// Unset variables leave the loaded value alone. The result is validated.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = read_env(ENV_HOST)? {
            info!("Using {ENV_HOST} override: {host}");
            self.listen.host = host;
        }

        if let Some(port) = read_env(ENV_PORT)? {
            self.listen.port = port.parse().map_err(|e| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_PORT}={port} is not a valid port: {e}"),
            })?;
            info!("Using {ENV_PORT} override: {}", self.listen.port);
        }

        if let Some(secs) = read_env(ENV_IDLE_TIMEOUT_SECS)? {
            let secs: u64 = secs.parse().map_err(|e| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_IDLE_TIMEOUT_SECS}={secs} is not a number of seconds: {e}"),
            })?;
            info!("Using {ENV_IDLE_TIMEOUT_SECS} override: {secs}");
            self.connection.idle_timeout_secs = Some(secs);
        }

        if let Some(level) = read_env(ENV_LOG_LEVEL)? {
            info!("Using {ENV_LOG_LEVEL} override: {level}");
            self.logging.level = level;
        }

        self.validate()
    }
}

#[track_caller]
fn read_env(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("{name} contains invalid unicode"),
        }),
    }
}
