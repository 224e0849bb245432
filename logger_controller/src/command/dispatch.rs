//! Controller command handlers.
//!
//! Handlers are tried in a fixed order and the first one that sets a result
//! wins:
//!
//! 1. lock (refuses everything else while locked)
//! 2. state logging
//! 3. data logging
//! 4. data logging period
//! 5. reset
//! 6. components, in registration order
//!
//! A handler that recognizes its variable always sets a result, including
//! `InvalidValue` for a value it does not understand.

use super::text::{data_logging_fragment, locked_fragment, period_fragment, reset_fragment, state_logging_fragment};
use super::{
    CMD_DATA_LOG, CMD_DATA_LOG_OFF, CMD_DATA_LOG_ON, CMD_DATA_LOG_PERIOD, CMD_DATA_LOG_PERIOD_HR,
    CMD_DATA_LOG_PERIOD_MIN, CMD_DATA_LOG_PERIOD_NUMBER, CMD_DATA_LOG_PERIOD_SEC,
    CMD_DATA_LOG_READS, CMD_LOCK, CMD_LOCK_OFF, CMD_LOCK_ON, CMD_RESET, CMD_RESET_DATA,
    CMD_RESET_STATE, CMD_STATE_LOG, CMD_STATE_LOG_OFF, CMD_STATE_LOG_ON, Command, CommandResult,
};
use crate::controller::Controller;
use crate::storage::LoggingType;

impl Controller {
    /// Run the handler chain on `command`.
    pub(crate) fn parse_command(&mut self, command: &mut Command) {
        if self.parse_locked(command)
            || self.parse_state_logging(command)
            || self.parse_data_logging(command)
            || self.parse_data_logging_period(command)
            || self.parse_reset(command)
        {
            return;
        }
        self.dispatch_to_components(command);
    }

    fn parse_locked(&mut self, command: &mut Command) -> bool {
        if command.is_variable(CMD_LOCK) {
            command.extract_value();
            if command.is_value(CMD_LOCK_ON) {
                let changed = self.change_locked(true);
                command.success(changed);
            } else if command.is_value(CMD_LOCK_OFF) {
                let changed = self.change_locked(false);
                command.success(changed);
            } else {
                command.error_value();
            }
            command.set_data(locked_fragment(self.state().locked));
        } else if self.state().locked {
            command.error_locked();
        }
        command.is_type_defined()
    }

    fn parse_state_logging(&mut self, command: &mut Command) -> bool {
        if command.is_variable(CMD_STATE_LOG) {
            command.extract_value();
            if command.is_value(CMD_STATE_LOG_ON) {
                let changed = self.change_state_logging(true);
                command.success(changed);
            } else if command.is_value(CMD_STATE_LOG_OFF) {
                let changed = self.change_state_logging(false);
                command.success(changed);
            } else {
                command.error_value();
            }
            command.set_data(state_logging_fragment(self.state().state_logging));
        }
        command.is_type_defined()
    }

    fn parse_data_logging(&mut self, command: &mut Command) -> bool {
        if command.is_variable(CMD_DATA_LOG) {
            command.extract_value();
            if command.is_value(CMD_DATA_LOG_ON) {
                let changed = self.change_data_logging(true);
                command.success(changed);
            } else if command.is_value(CMD_DATA_LOG_OFF) {
                let changed = self.change_data_logging(false);
                command.success(changed);
            } else {
                command.error_value();
            }
            command.set_data(data_logging_fragment(self.state().data_logging));
        }
        command.is_type_defined()
    }

    /// `period <n> s|m|h|#` or `reads <n>`.
    fn parse_data_logging_period(&mut self, command: &mut Command) -> bool {
        let by_reads = command.is_variable(CMD_DATA_LOG_READS);
        if !by_reads && !command.is_variable(CMD_DATA_LOG_PERIOD) {
            return false;
        }

        command.extract_value();
        match command.value().parse::<i32>() {
            Ok(value) if value > 0 => {
                let requested = if by_reads {
                    Some((value, LoggingType::ByEvent))
                } else {
                    command.extract_units();
                    period_in_base_units(command, value)
                };
                match requested {
                    Some((period, logging_type)) if self.is_period_valid(logging_type, period) => {
                        let changed = self.change_data_logging_period(period, logging_type);
                        command.success(changed);
                    }
                    Some(_) => command.error(CommandResult::PeriodRejected),
                    None => {}
                }
            }
            _ => command.error_value(),
        }

        let state = self.state();
        command.set_data(period_fragment(state.data_logging_period, state.data_logging_type));
        true
    }

    fn parse_reset(&mut self, command: &mut Command) -> bool {
        if command.is_variable(CMD_RESET) {
            command.extract_value();
            if command.is_value(CMD_RESET_DATA) {
                self.reset_data();
                command.success(true);
                command.set_data(reset_fragment(CMD_RESET_DATA));
            } else if command.is_value(CMD_RESET_STATE) {
                self.reset_state_on_next_startup();
                command.success(true);
                command.set_data(reset_fragment(CMD_RESET_STATE));
                command.set_message("reset state on next startup");
            } else {
                command.error_value();
            }
        }
        command.is_type_defined()
    }
}

/// Convert `value` with the command's units into seconds (`ByTime`) or reads
/// (`ByEvent`). Marks the command and returns `None` for unknown units or an
/// overflowing period.
fn period_in_base_units(command: &mut Command, value: i32) -> Option<(i32, LoggingType)> {
    let (factor, logging_type) = if command.is_units(CMD_DATA_LOG_PERIOD_NUMBER) {
        (1, LoggingType::ByEvent)
    } else if command.is_units(CMD_DATA_LOG_PERIOD_SEC) {
        (1, LoggingType::ByTime)
    } else if command.is_units(CMD_DATA_LOG_PERIOD_MIN) {
        (60, LoggingType::ByTime)
    } else if command.is_units(CMD_DATA_LOG_PERIOD_HR) {
        (3600, LoggingType::ByTime)
    } else {
        command.error_units();
        return None;
    };
    match value.checked_mul(factor) {
        Some(period) => Some((period, logging_type)),
        None => {
            command.error_value();
            None
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
