//! Persistent record encoding.
//!
//! A record is a fixed-size byte image stored in one participant's storage
//! range. Byte 0 is always the record version; the rest is record specific.
//! The version is a blunt invalidation switch: any change to a record's
//! layout must bump its `VERSION`, which discards all stored values on the
//! next startup.

use logger_common::consts::DEFAULT_STORAGE_CAPACITY;
use static_assertions::const_assert;
use std::fmt::Debug;

/// A fixed-size persistent record.
pub trait Record: Clone + Default + PartialEq + Debug {
    /// Compiled-in layout version. Byte 0 of every encoded record.
    const VERSION: u8;

    /// Encoded size in bytes.
    const SIZE: usize;

    /// Version stored in this instance.
    fn version(&self) -> u8;

    /// Overwrite the stored version (used to force a reset on next startup).
    fn set_version(&mut self, version: u8);

    /// Encode into exactly `SIZE` bytes, version first.
    fn encode(&self) -> Vec<u8>;

    /// Decode `SIZE` bytes. Returns `None` for malformed content.
    fn decode(bytes: &[u8]) -> Option<Self>;
}

/// Decode a stored boolean byte. Only 0 and 1 are valid.
#[inline]
pub fn decode_bool(byte: u8) -> Option<bool> {
    match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

// ─── Controller State ───────────────────────────────────────────────

/// How the data logging period is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LoggingType {
    /// Period is a number of seconds.
    #[default]
    ByTime = 1,
    /// Period is a number of readings of the primary data series.
    ByEvent = 2,
}

impl LoggingType {
    /// Convert from raw `u8` value. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ByTime),
            2 => Some(Self::ByEvent),
            _ => None,
        }
    }

    /// Unit label used in state texts.
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::ByTime => "s",
            Self::ByEvent => "reads",
        }
    }
}

/// Version of the controller record layout.
pub const CONTROLLER_STATE_VERSION: u8 = 4;

/// Default data logging period: 10 minutes.
pub const DEFAULT_DATA_LOGGING_PERIOD: i32 = 600;

/// Persistent controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    /// Record layout version.
    pub version: u8,
    /// Only the lock command is accepted while locked.
    pub locked: bool,
    /// Publish a state log for every command.
    pub state_logging: bool,
    /// Publish data logs when due.
    pub data_logging: bool,
    /// Seconds (`ByTime`) or reads (`ByEvent`) between data logs.
    pub data_logging_period: i32,
    /// Interpretation of `data_logging_period`.
    pub data_logging_type: LoggingType,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            version: CONTROLLER_STATE_VERSION,
            locked: false,
            state_logging: true,
            data_logging: false,
            data_logging_period: DEFAULT_DATA_LOGGING_PERIOD,
            data_logging_type: LoggingType::ByTime,
        }
    }
}

impl Record for ControllerState {
    const VERSION: u8 = CONTROLLER_STATE_VERSION;
    const SIZE: usize = 9;

    fn version(&self) -> u8 {
        self.version
    }

    fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.push(self.version);
        bytes.push(self.locked as u8);
        bytes.push(self.state_logging as u8);
        bytes.push(self.data_logging as u8);
        bytes.extend_from_slice(&self.data_logging_period.to_le_bytes());
        bytes.push(self.data_logging_type as u8);
        bytes
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        let period: [u8; 4] = bytes[4..8].try_into().ok()?;
        Some(Self {
            version: bytes[0],
            locked: decode_bool(bytes[1])?,
            state_logging: decode_bool(bytes[2])?,
            data_logging: decode_bool(bytes[3])?,
            data_logging_period: i32::from_le_bytes(period),
            data_logging_type: LoggingType::from_u8(bytes[8])?,
        })
    }
}

const_assert!(ControllerState::SIZE <= DEFAULT_STORAGE_CAPACITY);
