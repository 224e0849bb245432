//! # Field Logger Controller
//!
//! Controller core of a field data-logger: persistent state shared by the
//! controller and its components, a text command dispatcher, accumulated
//! sensor readings and size-bounded JSON logs for the remote service.
//!
//! The core only talks to the platform through the collaborator traits of
//! `logger_common::device`. Host implementations live in [`sim`].
//!
//! # Module Structure
//!
//! - [`storage`] - Storage layout, record encoding, versioned state stores
//! - [`command`] - Command value, vocabulary and the dispatch chain
//! - [`data`] - Data series, due check and log chunking
//! - [`report`] - State report, state logs and data information
//! - [`display`] - Display line texts
//! - [`component`] - Component trait
//! - [`components`] - Bundled components
//! - [`controller`] - The controller
//! - [`sim`] - Host collaborators
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                          Controller                               │
//! │  ┌──────────────┐   ┌────────────────┐   ┌─────────────────────┐  │
//! │  │ StorageLayout│──►│ StateStore<R>  │◄──│ dispatch chain      │◄─┼── receive_command()
//! │  └──────────────┘   └────────────────┘   └──────────┬──────────┘  │
//! │                                                     │             │
//! │  ┌──────────────┐   ┌────────────────┐   ┌──────────▼──────────┐  │
//! │  │ DataBuffer   │──►│ LogChunker     │   │ Vec<Box<dyn         │  │
//! │  │              │   │                │   │   Component>>       │  │
//! │  └──────▲───────┘   └───────┬────────┘   └─────────────────────┘  │
//! │         │ tick()            │ chunks                              │
//! └─────────┼───────────────────┼─────────────────────────────────────┘
//!           │                   ▼
//!      update()       Transport / Display / Clock / PersistentStorage
//! ```

#![deny(missing_docs)]

pub mod command;
pub mod component;
pub mod components;
pub mod controller;
pub mod data;
pub mod display;
pub mod error;
pub mod json;
pub mod report;
pub mod sim;
pub mod storage;

// Re-export key types for convenience
pub use crate::command::{Command, CommandResult};
pub use crate::component::Component;
pub use crate::controller::{Collaborators, Controller, PayloadLimits};
pub use crate::error::{ControllerError, LayoutError, PayloadError, PublishError};
