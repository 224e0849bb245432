//! Logger configuration.
//!
//! A logger instance is configured from one TOML file with a `[shared]`
//! section, an optional `[device]` section for storage and payload budgets
//! and an optional `[debug]` section for the debug output categories.
//!
//! # Usage
//!
//! ```rust,no_run
//! use logger_common::config::{ConfigLoader, LoggerConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = LoggerConfig::load(Path::new("logger.toml"))?;
//!     config.validate()?;
//!     println!("Controller: {}", config.device.version);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::consts::{
    DATA_INFO_MAX_CHAR, DATA_LOG_MAX_CHAR, DATA_LOG_RESERVED_MARGIN, DEFAULT_STORAGE_CAPACITY,
    DEFAULT_STORAGE_FILE, STATE_INFO_MAX_CHAR, STATE_LOG_MAX_CHAR,
};
use crate::debug::DebugFlags;

/// Failure to load or validate a logger configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Parsed, but a value is out of range.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Verbosity of the `tracing` output, written in lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Dispatch and storage details.
    Debug,
    /// State changes, publishes and connection events.
    #[default]
    Info,
    /// Refused registrations and failed publishes.
    Warn,
    /// Only failures.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across all logger applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "logger-sim-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Device-level settings: identity, storage and payload budgets.
///
/// Every field has a default so a `[device]` table may be partial or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Controller version string reported in the state report.
    pub version: String,
    /// Size of the persistent storage region in bytes.
    pub storage_capacity: usize,
    /// Backing file of the persistent storage image.
    pub storage_path: PathBuf,
    /// Reset all persistent state to defaults on startup.
    pub reset_on_startup: bool,
    /// Maximum size of one data log chunk.
    pub data_log_max_bytes: usize,
    /// Maximum size of one state log.
    pub state_log_max_bytes: usize,
    /// Maximum size of the state report.
    pub state_info_max_bytes: usize,
    /// Maximum size of the data information.
    pub data_info_max_bytes: usize,
    /// Driver loop tick period [ms].
    pub tick_ms: u64,
    /// Period of simulated sensor readings [ms].
    pub read_period_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: concat!("logger ", env!("CARGO_PKG_VERSION")).to_string(),
            storage_capacity: DEFAULT_STORAGE_CAPACITY,
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
            reset_on_startup: false,
            data_log_max_bytes: DATA_LOG_MAX_CHAR,
            state_log_max_bytes: STATE_LOG_MAX_CHAR,
            state_info_max_bytes: STATE_INFO_MAX_CHAR,
            data_info_max_bytes: DATA_INFO_MAX_CHAR,
            tick_ms: 100,
            read_period_ms: 1000,
        }
    }
}

impl DeviceConfig {
    /// Validate the device configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `version` is empty
    /// - `storage_capacity` is zero
    /// - `data_log_max_bytes` does not exceed the reserved chunk margin
    /// - `tick_ms` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::ValidationError(
                "device.version cannot be empty".to_string(),
            ));
        }
        if self.storage_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "device.storage_capacity must be > 0".to_string(),
            ));
        }
        if self.data_log_max_bytes <= DATA_LOG_RESERVED_MARGIN {
            return Err(ConfigError::ValidationError(format!(
                "device.data_log_max_bytes must exceed the reserved margin ({DATA_LOG_RESERVED_MARGIN})"
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ValidationError(
                "device.tick_ms must be > 0".to_string(),
            ));
        }
        if self.data_log_max_bytes > DATA_LOG_MAX_CHAR {
            warn!(
                "device.data_log_max_bytes={} exceeds the service publish limit ({})",
                self.data_log_max_bytes, DATA_LOG_MAX_CHAR
            );
        }
        Ok(())
    }
}

/// Debug output categories, one switch per category.
///
/// # TOML Example
///
/// ```toml
/// [debug]
/// state = true
/// webhooks = false
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugConfig {
    /// Extra output about state changes.
    pub state: bool,
    /// Extra output about data clearing and log triggers.
    pub data: bool,
    /// Extra output about readable values and publishing.
    pub cloud: bool,
    /// Expose logs as readable values instead of publishing them.
    pub webhooks: bool,
}

impl DebugConfig {
    /// Convert the switches into a flag set.
    pub fn flags(&self) -> DebugFlags {
        let mut flags = DebugFlags::empty();
        flags.set(DebugFlags::STATE, self.state);
        flags.set(DebugFlags::DATA, self.data);
        flags.set(DebugFlags::CLOUD, self.cloud);
        flags.set(DebugFlags::WEBHOOKS, self.webhooks);
        flags
    }
}

/// Complete configuration of a logger instance.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "logger-sim"
///
/// [device]
/// version = "demo 1.0"
/// storage_capacity = 512
///
/// [debug]
/// data = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Common application settings.
    pub shared: SharedConfig,
    /// Device settings.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Debug categories.
    #[serde(default)]
    pub debug: DebugConfig,
}

impl LoggerConfig {
    /// Configuration used when no file is given.
    pub fn with_service_name(service_name: &str) -> Self {
        Self {
            shared: SharedConfig {
                log_level: LogLevel::default(),
                service_name: service_name.to_string(),
            },
            device: DeviceConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate all sections.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::ValidationError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.device.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
