//! State texts: JSON fragments for logs/reports and compact display forms.

use crate::json::{Fragment, key_value, key_value_unit};
use crate::storage::record::LoggingType;

/// State key: lock.
pub const KEY_LOCKED: &str = "locked";
/// State key: state logging.
pub const KEY_STATE_LOG: &str = "state_log";
/// State key: data logging.
pub const KEY_DATA_LOG: &str = "data_log";
/// State key: data logging period.
pub const KEY_LOG_PERIOD: &str = "log_period";
/// State key: reset request.
pub const KEY_RESET: &str = "reset";

/// `{"k":"locked","v":bool}`
pub fn locked_fragment(locked: bool) -> Fragment {
    key_value(KEY_LOCKED, locked)
}

/// `{"k":"state_log","v":bool}`
pub fn state_logging_fragment(on: bool) -> Fragment {
    key_value(KEY_STATE_LOG, on)
}

/// `{"k":"data_log","v":bool}`
pub fn data_logging_fragment(on: bool) -> Fragment {
    key_value(KEY_DATA_LOG, on)
}

/// `{"k":"log_period","v":n,"u":"s"|"reads"}`
pub fn period_fragment(period: i32, logging_type: LoggingType) -> Fragment {
    key_value_unit(KEY_LOG_PERIOD, period, logging_type.unit())
}

/// `{"k":"reset","v":"data"|"state"}`
pub fn reset_fragment(what: &str) -> Fragment {
    key_value(KEY_RESET, what)
}

/// Compact period for the status line: `30s`, `5m`, `2h`, `10#`.
pub fn compact_period(period: i32, logging_type: LoggingType) -> String {
    match logging_type {
        LoggingType::ByEvent => format!("{period}#"),
        LoggingType::ByTime if period != 0 && period % 3600 == 0 => format!("{}h", period / 3600),
        LoggingType::ByTime if period != 0 && period % 60 == 0 => format!("{}m", period / 60),
        LoggingType::ByTime => format!("{period}s"),
    }
}

/// Human readable period for log messages: `300 seconds`, `10 reads`.
pub fn describe_period(period: i32, logging_type: LoggingType) -> String {
    match logging_type {
        LoggingType::ByTime => format!("{period} seconds"),
        LoggingType::ByEvent => format!("{period} reads"),
    }
}
