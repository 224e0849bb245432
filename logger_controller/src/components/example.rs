//! Example component: one persistent on/off setting.
//!
//! Command: `setting yay|nay [notes]`.

use logger_common::device::{Display, PersistentStorage, StorageError};
use tracing::info;

use crate::command::Command;
use crate::component::Component;
use crate::json::{Fragment, key_value};
use crate::storage::record::{Record, decode_bool};
use crate::storage::StateStore;

/// Setting variable.
pub const CMD_SETTING: &str = "setting";
/// Setting on.
pub const CMD_SETTING_ON: &str = "yay";
/// Setting off.
pub const CMD_SETTING_OFF: &str = "nay";

/// Display row used by the component.
const DISPLAY_ROW: u8 = 3;

/// Persistent record of the example component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleState {
    /// Record layout version.
    pub version: u8,
    /// The setting.
    pub setting: bool,
}

impl Default for ExampleState {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            setting: false,
        }
    }
}

impl Record for ExampleState {
    const VERSION: u8 = 3;
    const SIZE: usize = 2;

    fn version(&self) -> u8 {
        self.version
    }

    fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    fn encode(&self) -> Vec<u8> {
        vec![self.version, self.setting as u8]
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [version, setting] => Some(Self {
                version: *version,
                setting: decode_bool(*setting)?,
            }),
            _ => None,
        }
    }
}

/// Component with a single persistent setting.
#[derive(Debug)]
pub struct ExampleComponent {
    store: StateStore<ExampleState>,
}

impl ExampleComponent {
    /// Create the component with default state.
    pub fn new(id: &str) -> Self {
        Self::with_state(id, ExampleState::default())
    }

    /// Create the component with custom defaults.
    pub fn with_state(id: &str, state: ExampleState) -> Self {
        Self {
            store: StateStore::new(id, state),
        }
    }

    /// Current setting.
    pub fn setting(&self) -> bool {
        self.store.get().setting
    }

    /// Change the setting. Returns true if it changed.
    pub fn change_setting(&mut self, storage: &mut dyn PersistentStorage, on: bool) -> bool {
        let changed = self.store.update(storage, |s| {
            let changed = s.setting != on;
            s.setting = on;
            changed
        });
        if changed {
            info!("Setting of '{}' turned {}", self.id(), on_off(on));
        } else {
            info!("Setting of '{}' already {}", self.id(), on_off(on));
        }
        changed
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

impl Component for ExampleComponent {
    fn id(&self) -> &str {
        self.store.participant()
    }

    fn state_size(&self) -> usize {
        ExampleState::SIZE
    }

    fn attach_storage(&mut self, offset: usize) {
        self.store.attach(offset);
    }

    fn load_state(&mut self, storage: &mut dyn PersistentStorage, reset: bool) {
        self.store.load(storage, reset);
    }

    fn save_state(&mut self, storage: &mut dyn PersistentStorage) -> Result<(), StorageError> {
        self.store.save(storage)
    }

    fn restore_state(&mut self, storage: &mut dyn PersistentStorage) -> bool {
        self.store.restore(storage)
    }

    fn parse_command(&mut self, command: &mut Command, storage: &mut dyn PersistentStorage) -> bool {
        if !command.is_variable(CMD_SETTING) {
            return false;
        }
        command.extract_value();
        if command.is_value(CMD_SETTING_ON) {
            let changed = self.change_setting(storage, true);
            command.success(changed);
        } else if command.is_value(CMD_SETTING_OFF) {
            let changed = self.change_setting(storage, false);
            command.success(changed);
        } else {
            command.error_value();
        }
        command.set_data(key_value(CMD_SETTING, self.setting()));
        true
    }

    fn update_display_state(&mut self, display: &mut dyn Display) {
        display.print_line(DISPLAY_ROW, &format!("setting: {}", on_off(self.setting())));
    }

    fn assemble_state_fragment(&self) -> Vec<Fragment> {
        vec![key_value(CMD_SETTING, self.setting())]
    }
}
