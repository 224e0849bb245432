//! Display line texts.
//!
//! Row 1 shows the device name on the left and the status flags on the
//! right; commands and log results flash on row 1 temporarily. Row 2 carries
//! the connection message. Components use the remaining rows.

use heapless::String as FixedString;
use logger_common::consts::DISPLAY_COLS;

use crate::command::text::compact_period;
use crate::command::{Command, CommandResult};
use crate::storage::record::ControllerState;

/// One display row.
pub type DisplayLine = FixedString<DISPLAY_COLS>;

/// Row for name, status and flash messages.
pub const STATUS_ROW: u8 = 1;
/// Row for the connection message.
pub const CONNECTION_ROW: u8 = 2;

/// Flash: data log published.
pub const MSG_DATA_LOG_SENT: &str = "INFO: data log sent";
/// Flash: data log publish failed.
pub const MSG_DATA_LOG_ERROR: &str = "ERR: data log error";
/// Flash: data log entry or chunk over budget.
pub const MSG_DATA_LOG_TOO_BIG: &str = "ERR: datalog too big";
/// Flash: state log over budget.
pub const MSG_STATE_LOG_TOO_BIG: &str = "ERR: statelog too big";
/// Connection in progress.
pub const MSG_CONNECTING: &str = "Connect WiFi...";
/// Startup with reset request.
pub const MSG_RESETTING: &str = "Resetting...";

/// Copy `text` into a fixed-capacity string, cutting it at `N` bytes on a
/// character boundary.
pub fn truncated<const N: usize>(text: &str) -> FixedString<N> {
    let mut out = FixedString::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `"<short>: <command>"`, or `"LOCK<short>: <command>"` when refused
/// because the device is locked.
pub fn command_line(command: &Command) -> DisplayLine {
    let result = command.result().unwrap_or(CommandResult::UnknownCommand);
    let lock = if result == CommandResult::Locked { "LOCK" } else { "" };
    truncated(&format!("{lock}{}: {}", result.short_label(), command.raw()))
}

/// Status flags: `W`/`!` connection, `L` locked, `S` state logging,
/// `D<period>` data logging.
pub fn status_line(connected: bool, state: &ControllerState) -> DisplayLine {
    let mut text = String::from(if connected { "W" } else { "!" });
    if state.locked {
        text.push('L');
    }
    if state.state_logging {
        text.push('S');
    }
    if state.data_logging {
        text.push('D');
        text.push_str(&compact_period(
            state.data_logging_period,
            state.data_logging_type,
        ));
    }
    truncated(&text)
}
