//! Pluggable device components.
//!
//! A component adds device-specific behavior to the controller: its own
//! persistent record, its own commands, its own state report entries and
//! optionally its own data series.

use logger_common::device::{Display, PersistentStorage, StorageError};

use crate::command::Command;
use crate::data::DataBuffer;
use crate::json::Fragment;

/// Trait implemented by every device component.
///
/// The controller drives components through this trait, always in
/// registration order.
///
/// # Lifecycle
///
/// | Step | Call | When |
/// |------|------|------|
/// | 1 | `state_size()`, `attach_storage()` | `Controller::add_component` |
/// | 2 | `load_state()` | `Controller::init`, after the controller's own state |
/// | 3 | `init()` | `Controller::init`, after all states are loaded |
/// | 4 | `parse_command()` | every command no controller handler claimed |
/// | 5 | `tick()` | every `Controller::update` |
///
/// Components whose record does not fit in storage are never attached and
/// never added; none of these methods is called on them.
pub trait Component {
    /// Unique identifier, used for the storage allocation and in logs.
    fn id(&self) -> &str;

    /// Size of the persistent record in bytes.
    fn state_size(&self) -> usize;

    /// Assign the storage offset of the component's record.
    fn attach_storage(&mut self, offset: usize);

    /// One-time setup after the state was loaded. Components register their
    /// data series here.
    fn init(&mut self, _data: &mut DataBuffer) {}

    /// Restore the record, or persist defaults when `reset` is set or the
    /// stored record is stale.
    fn load_state(&mut self, storage: &mut dyn PersistentStorage, reset: bool);

    /// Write the record to storage.
    ///
    /// # Errors
    /// Propagates the storage error.
    fn save_state(&mut self, storage: &mut dyn PersistentStorage) -> Result<(), StorageError>;

    /// Replace the record with the stored one if its version matches.
    fn restore_state(&mut self, storage: &mut dyn PersistentStorage) -> bool;

    /// Try to handle `command`. Returns true if the component claimed it
    /// (including claimed-with-error).
    fn parse_command(&mut self, command: &mut Command, storage: &mut dyn PersistentStorage) -> bool;

    /// Refresh the component's part of the display.
    fn update_display_state(&mut self, _display: &mut dyn Display) {}

    /// State report entries of the component.
    fn assemble_state_fragment(&self) -> Vec<Fragment>;

    /// Periodic work (e.g. taking readings). Default: no-op.
    fn tick(&mut self, _now_ms: u64, _data: &mut DataBuffer) {}
}
