//! Collaborator traits and error types.
//!
//! The controller core never touches hardware directly. Each platform
//! provides implementations of:
//! - `PersistentStorage` - small byte-addressable non-volatile region
//! - `Transport` - connection to the remote service
//! - `Clock` - wall clock, monotonic milliseconds and formatting
//! - `Display` - small character display
//!
//! All calls are made from the single driver loop; implementations do not
//! need to be `Send` or `Sync`.

use thiserror::Error;

use crate::consts::MAC_ADDRESS_LEN;

/// Error types for persistent storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Access past the end of the storage region.
    #[error("Storage access out of bounds: {size} bytes at offset {offset} (capacity {capacity})")]
    OutOfBounds {
        /// Requested start offset
        offset: usize,
        /// Requested length
        size: usize,
        /// Storage capacity
        capacity: usize,
    },

    /// Backing medium failure.
    #[error("Storage I/O error: {0}")]
    Io(String),
}

/// Check that `size` bytes starting at `offset` fit in `capacity`.
///
/// # Errors
/// Returns `StorageError::OutOfBounds` if the range does not fit.
pub fn check_bounds(capacity: usize, offset: usize, size: usize) -> Result<(), StorageError> {
    match offset.checked_add(size) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(StorageError::OutOfBounds {
            offset,
            size,
            capacity,
        }),
    }
}

/// Byte-addressable persistent storage with a fixed capacity.
pub trait PersistentStorage {
    /// Total size of the storage region in bytes.
    fn capacity(&self) -> usize;

    /// Read `size` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns `StorageError::OutOfBounds` if the range exceeds the capacity.
    fn read(&self, offset: usize, size: usize) -> Result<Vec<u8>, StorageError>;

    /// Write `bytes` starting at `offset`.
    ///
    /// # Errors
    /// Returns `StorageError::OutOfBounds` if the range exceeds the capacity,
    /// or `StorageError::Io` if the backing medium fails.
    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Connection to the remote service.
///
/// Inbound traffic (command invocations, subscription payloads) is delivered
/// by the driver loop calling into the controller between ticks; this trait
/// only covers the outbound direction and registration.
pub trait Transport {
    /// Whether the connection to the service is currently up.
    fn is_connected(&self) -> bool;

    /// Start connecting. Non-blocking; progress is observed via `is_connected`.
    fn connect(&mut self);

    /// Service background work. Called once per tick while connected.
    fn process(&mut self) {}

    /// Hardware address of the network interface.
    fn mac_address(&self) -> [u8; MAC_ADDRESS_LEN];

    /// Publish `payload` on `channel`. Best effort; returns whether the
    /// service acknowledged it.
    fn publish(&mut self, channel: &str, payload: &str) -> bool;

    /// Register the remote command function under `name`.
    fn register_command_handler(&mut self, name: &str) -> bool;

    /// Expose (or refresh) a value the service can read under `name`.
    fn expose_readable_value(&mut self, name: &str, value: &str);

    /// Subscribe to events whose name starts with `topic`.
    fn subscribe(&mut self, topic: &str) -> bool;
}

/// Wall clock and monotonic time source.
pub trait Clock {
    /// Current wall clock time in seconds since the Unix epoch.
    fn now(&self) -> i64;

    /// Milliseconds since device start. Monotonic.
    fn monotonic_millis(&self) -> u64;

    /// Human readable representation of `timestamp` (e.g. `2024-01-31 12:00:00 UTC`).
    fn format(&self, timestamp: i64) -> String;
}

/// Small character display.
///
/// Rows are numbered from 1. Texts longer than a row are truncated by the
/// implementation.
pub trait Display {
    /// Prepare the display. Default: no-op.
    fn init(&mut self) {}

    /// Periodic refresh (e.g. expire temporary messages). Default: no-op.
    fn update(&mut self) {}

    /// Show `text` on `row`, left aligned.
    fn print_line(&mut self, row: u8, text: &str);

    /// Show `text` on `row` for a limited time, then restore the row.
    fn print_line_temporary(&mut self, row: u8, text: &str);

    /// Show `text` right aligned on `row`, keeping the left part of the row.
    fn print_line_right_aligned(&mut self, row: u8, text: &str);
}
