//! Inbound text commands.
//!
//! A `Command` is created for every invocation of the remote command
//! function, walked through the dispatch chain and dropped after the state
//! log and state report have been produced. Nothing in it is persisted.
//!
//! Text format: `<variable> <value> [<units>] [notes...]`, whitespace
//! separated. Tokens are consumed left to right by the handler that claims
//! the variable; whatever is left over becomes the notes.

pub mod dispatch;
pub mod text;

use serde_json::value::RawValue;

use crate::json::Fragment;

// ─── Vocabulary ─────────────────────────────────────────────────────

/// Lock variable.
pub const CMD_LOCK: &str = "lock";
/// Lock value.
pub const CMD_LOCK_ON: &str = "yay";
/// Unlock value.
pub const CMD_LOCK_OFF: &str = "nay";

/// State logging variable.
pub const CMD_STATE_LOG: &str = "state-log";
/// State logging on.
pub const CMD_STATE_LOG_ON: &str = "on";
/// State logging off.
pub const CMD_STATE_LOG_OFF: &str = "off";

/// Data logging variable.
pub const CMD_DATA_LOG: &str = "data-log";
/// Data logging on.
pub const CMD_DATA_LOG_ON: &str = "on";
/// Data logging off.
pub const CMD_DATA_LOG_OFF: &str = "off";

/// Data logging period variable (`period <n> <units>`).
pub const CMD_DATA_LOG_PERIOD: &str = "period";
/// Data logging period by read count (`reads <n>`).
pub const CMD_DATA_LOG_READS: &str = "reads";
/// Period units: number of reads.
pub const CMD_DATA_LOG_PERIOD_NUMBER: &str = "#";
/// Period units: seconds.
pub const CMD_DATA_LOG_PERIOD_SEC: &str = "s";
/// Period units: minutes.
pub const CMD_DATA_LOG_PERIOD_MIN: &str = "m";
/// Period units: hours.
pub const CMD_DATA_LOG_PERIOD_HR: &str = "h";

/// Reset variable.
pub const CMD_RESET: &str = "reset";
/// Reset accumulated data.
pub const CMD_RESET_DATA: &str = "data";
/// Reset persistent state on next startup.
pub const CMD_RESET_STATE: &str = "state";

// ─── Result ─────────────────────────────────────────────────────────

/// Outcome of a command.
///
/// Codes ≥ 0 are the success/warning tier, codes < 0 are errors. The code is
/// what the remote command function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// State changed.
    Success,
    /// Well-formed, but the state already had the requested value.
    NoChange,
    /// Device is locked.
    Locked,
    /// No handler claimed the command.
    UnknownCommand,
    /// Command text has no variable.
    UnknownVariable,
    /// Value not recognized or out of range.
    InvalidValue,
    /// Units not recognized.
    InvalidUnits,
    /// Logging period rejected by the validity hook.
    PeriodRejected,
    /// Component-defined error. Codes should be below -100.
    Custom {
        /// Result code
        code: i32,
        /// Short label for the display
        short: &'static str,
        /// Long label for the state log
        long: &'static str,
    },
}

impl CommandResult {
    /// Numeric result code.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::NoChange => 1,
            Self::Locked => -1,
            Self::UnknownCommand => -2,
            Self::UnknownVariable => -3,
            Self::InvalidValue => -4,
            Self::InvalidUnits => -5,
            Self::PeriodRejected => -6,
            Self::Custom { code, .. } => *code,
        }
    }

    /// Returns true for the error tier.
    #[inline]
    pub const fn is_error(&self) -> bool {
        self.code() < 0
    }

    /// Returns true if the command actually changed something.
    #[inline]
    pub const fn is_change(&self) -> bool {
        self.code() >= 0 && !matches!(self, Self::NoChange)
    }

    /// Short label for the display.
    pub const fn short_label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::NoChange => "NC",
            Self::Custom { short, .. } => *short,
            _ => "ERR",
        }
    }

    /// Long label, used as the state log type.
    pub const fn long_label(&self) -> &'static str {
        match self {
            Self::Success => "state changed",
            Self::NoChange => "state unchanged",
            Self::Locked => "error",
            Self::UnknownCommand => "error",
            Self::UnknownVariable => "error",
            Self::InvalidValue => "error",
            Self::InvalidUnits => "error",
            Self::PeriodRejected => "error",
            Self::Custom { long, .. } => *long,
        }
    }

    /// Default message describing an error.
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Locked => "device is locked",
            Self::UnknownCommand => "unknown command",
            Self::UnknownVariable => "missing or unknown variable",
            Self::InvalidValue => "invalid value",
            Self::InvalidUnits => "invalid units",
            Self::PeriodRejected => "logging period not allowed",
            _ => "",
        }
    }
}

// ─── Command ────────────────────────────────────────────────────────

/// One inbound command being dispatched.
#[derive(Debug)]
pub struct Command {
    raw: String,
    remaining: String,
    variable: String,
    value: String,
    units: String,
    result: Option<CommandResult>,
    data: Option<Fragment>,
    message: String,
}

impl Command {
    /// Load raw command text. All result fields start empty.
    pub fn load(text: &str) -> Self {
        let raw = text.trim().to_string();
        Self {
            remaining: raw.clone(),
            raw,
            variable: String::new(),
            value: String::new(),
            units: String::new(),
            result: None,
            data: None,
            message: String::new(),
        }
    }

    fn next_token(&mut self) -> String {
        let trimmed = self.remaining.trim_start();
        let split = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(split);
        let token = token.to_string();
        self.remaining = rest.to_string();
        token
    }

    /// Split off the leading token as the variable name.
    pub fn extract_variable(&mut self) {
        self.variable = self.next_token();
    }

    /// Split off the next token as the value.
    pub fn extract_value(&mut self) {
        self.value = self.next_token();
    }

    /// Split off the next token as the units.
    pub fn extract_units(&mut self) {
        self.units = self.next_token();
    }

    /// Whether the variable equals `name`.
    #[inline]
    pub fn is_variable(&self, name: &str) -> bool {
        self.variable == name
    }

    /// Whether the value equals `value`.
    #[inline]
    pub fn is_value(&self, value: &str) -> bool {
        self.value == value
    }

    /// Whether the units equal `units`.
    #[inline]
    pub fn is_units(&self, units: &str) -> bool {
        self.units == units
    }

    /// Full command text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Extracted variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Extracted value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Extracted units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Text not consumed by any extraction.
    pub fn notes(&self) -> &str {
        self.remaining.trim()
    }

    /// Mark the outcome of a state change: `Success` if `changed`, `NoChange` otherwise.
    pub fn success(&mut self, changed: bool) {
        self.result = Some(if changed {
            CommandResult::Success
        } else {
            CommandResult::NoChange
        });
    }

    /// Mark an error with its default message.
    pub fn error(&mut self, result: CommandResult) {
        self.result = Some(result);
        if self.message.is_empty() {
            self.message = result.default_message().to_string();
        }
    }

    /// Mark the device-locked error.
    pub fn error_locked(&mut self) {
        self.error(CommandResult::Locked);
    }

    /// Mark an invalid value.
    pub fn error_value(&mut self) {
        self.error(CommandResult::InvalidValue);
    }

    /// Mark invalid units.
    pub fn error_units(&mut self) {
        self.error(CommandResult::InvalidUnits);
    }

    /// Mark the command as not claimed by any handler.
    pub fn error_command(&mut self) {
        if self.variable.is_empty() {
            self.error(CommandResult::UnknownVariable);
        } else {
            self.error(CommandResult::UnknownCommand);
        }
    }

    /// Whether a handler has set a result.
    #[inline]
    pub fn is_type_defined(&self) -> bool {
        self.result.is_some()
    }

    /// Outcome, if any handler set one.
    pub fn result(&self) -> Option<CommandResult> {
        self.result
    }

    /// Result code returned to the transport (`UnknownCommand` if unset).
    pub fn code(&self) -> i32 {
        self.result.unwrap_or(CommandResult::UnknownCommand).code()
    }

    /// Attach the structured description of the affected state.
    pub fn set_data(&mut self, data: Fragment) {
        self.data = Some(data);
    }

    /// Structured description of the affected state.
    pub fn data(&self) -> Option<&RawValue> {
        self.data.as_deref()
    }

    /// Set the free-text log message.
    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    /// Free-text log message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
