//! System-wide constants for the logger workspace.
//!
//! Single source of truth for buffer limits, storage defaults and the names
//! of the channels the controller talks to. Imported by all crates.

// ─── Persistent Storage ─────────────────────────────────────────────

/// Storage address of the controller's own record. Component records follow it.
pub const CONTROLLER_STATE_ADDRESS: usize = 0;

/// Default size of the persistent storage region in bytes.
pub const DEFAULT_STORAGE_CAPACITY: usize = 2047;

/// Byte value of erased (never written) storage.
pub const ERASED_BYTE: u8 = 0xFF;

// ─── Payload Limits ─────────────────────────────────────────────────

/// Maximum size of the state report exposed as a readable value.
pub const STATE_INFO_MAX_CHAR: usize = 600;

/// Maximum size of the data information exposed as a readable value.
pub const DATA_INFO_MAX_CHAR: usize = 600;

/// Maximum size of one published state log.
pub const STATE_LOG_MAX_CHAR: usize = 622;

/// Maximum size of one published data log chunk.
pub const DATA_LOG_MAX_CHAR: usize = 622;

/// Bytes of a data log chunk reserved for the envelope (`id`, `to`, brackets).
pub const DATA_LOG_RESERVED_MARGIN: usize = 50;

// ─── Device Identity ────────────────────────────────────────────────

/// Maximum number of characters kept from the device name.
pub const DEVICE_NAME_MAX_CHARS: usize = 19;

/// Number of bytes in the hardware (MAC) address.
pub const MAC_ADDRESS_LEN: usize = 6;

// ─── Display ────────────────────────────────────────────────────────

/// Number of display rows.
pub const DISPLAY_ROWS: u8 = 4;

/// Number of characters per display row.
pub const DISPLAY_COLS: usize = 20;

/// How long a temporary display message stays visible [ms].
pub const DISPLAY_TEMP_MESSAGE_MS: u64 = 3000;

// ─── Transport Channels ─────────────────────────────────────────────

/// Name of the remote command function.
pub const CMD_ROOT: &str = "device";

/// Readable value holding the state report.
pub const STATE_INFO_VARIABLE: &str = "state";

/// Readable value holding the data information.
pub const DATA_INFO_VARIABLE: &str = "data";

/// Event channel for state-change logs.
pub const STATE_LOG_WEBHOOK: &str = "state_log";

/// Event channel for data log chunks.
pub const DATA_LOG_WEBHOOK: &str = "data_log";

/// Subscription prefix under which the device name arrives.
pub const NAME_TOPIC: &str = "spark/";

/// Channel used to request the device name from the service.
pub const NAME_REQUEST_CHANNEL: &str = "spark/device/name";

// ─── Defaults ───────────────────────────────────────────────────────

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/logger/logger.toml";

/// Default persistent storage image file name.
pub const DEFAULT_STORAGE_FILE: &str = "logger_state.bin";
