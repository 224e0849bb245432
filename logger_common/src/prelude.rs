//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use logger_common::prelude::*;`.
//!
//! # Usage
//!
//! ```rust
//! use logger_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, DebugConfig, DeviceConfig, LogLevel, LoggerConfig, SharedConfig,
};

// ─── Debug ──────────────────────────────────────────────────────────
pub use crate::debug::DebugFlags;

// ─── Collaborators ──────────────────────────────────────────────────
pub use crate::device::{Clock, Display, PersistentStorage, StorageError, Transport};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DATA_LOG_MAX_CHAR, DEFAULT_STORAGE_CAPACITY, STATE_LOG_MAX_CHAR};
