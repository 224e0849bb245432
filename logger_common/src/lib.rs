//! Field Logger Common Library
//!
//! This crate provides shared constants, configuration loading utilities and
//! the collaborator traits (storage, transport, clock, display) that the
//! logger controller is written against.
//!
//! # Module Structure
//!
//! - [`consts`] - Buffer limits, storage defaults and channel names
//! - [`config`] - Configuration loading traits and types
//! - [`debug`] - Debug output categories
//! - [`device`] - Collaborator traits implemented by each platform
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use logger_common::consts::DATA_LOG_MAX_CHAR;
//! use logger_common::config::{ConfigLoader, LoggerConfig};
//! ```

pub mod config;
pub mod consts;
pub mod debug;
pub mod device;
pub mod prelude;
