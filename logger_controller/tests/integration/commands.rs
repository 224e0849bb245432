//! Integration test: commands end to end.
//!
//! Validates: result codes, persistence of every state change, state logs
//! published for dispatched commands and state report refreshes.

use logger_common::consts::{STATE_INFO_VARIABLE, STATE_LOG_WEBHOOK};
use logger_controller::CommandResult;
use logger_controller::storage::{ControllerState, Record};

use super::{Rig, json};

// ─── Result codes and persistence ───────────────────────────────────

#[test]
fn test_lock_is_persisted_and_idempotent() {
    let mut rig = Rig::new().init(false);
    let writes = rig.storage.write_count();

    assert_eq!(rig.controller.receive_command("lock yay"), 0);
    assert_eq!(rig.storage.write_count(), writes + 1);
    let stored = ControllerState::decode(&rig.storage.snapshot()[..ControllerState::SIZE]);
    assert!(stored.is_some_and(|s| s.locked));

    assert_eq!(rig.controller.receive_command("lock yay"), 1);
    assert_eq!(rig.storage.write_count(), writes + 1);
}

#[test]
fn test_invalid_values_do_not_touch_storage() {
    let mut rig = Rig::new().init(false);
    let writes = rig.storage.write_count();

    assert_eq!(
        rig.controller.receive_command("reads 0"),
        CommandResult::InvalidValue.code()
    );
    assert_eq!(
        rig.controller.receive_command("period 3 weeks"),
        CommandResult::InvalidUnits.code()
    );
    assert_eq!(
        rig.controller.receive_command("setting maybe"),
        CommandResult::InvalidValue.code()
    );
    assert_eq!(rig.storage.write_count(), writes);
}

#[test]
fn test_unclaimed_commands() {
    let mut rig = Rig::new().init(false);
    assert_eq!(
        rig.controller.receive_command("calibrate now"),
        CommandResult::UnknownCommand.code()
    );
    assert_eq!(
        rig.controller.receive_command("   "),
        CommandResult::UnknownVariable.code()
    );
}

#[test]
fn test_component_command_reaches_component_storage() {
    let mut rig = Rig::new().init(false);
    assert_eq!(rig.controller.receive_command("setting yay"), 0);

    let example = rig
        .controller
        .layout()
        .allocation("example")
        .expect("example allocation")
        .clone();
    let bytes = rig.storage.snapshot();
    assert_eq!(&bytes[example.offset..example.end()], &[3, 1]);
}

// ─── State logs ─────────────────────────────────────────────────────

#[test]
fn test_state_log_published_for_command() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    rig.transport.clear_published();

    rig.controller.receive_command("lock yay after maintenance");
    let logs = rig.transport.published_on(STATE_LOG_WEBHOOK);
    assert_eq!(logs.len(), 1);

    let log = json(&logs[0]);
    assert_eq!(log["id"], "field-7");
    assert_eq!(log["t"], "state changed");
    assert_eq!(log["s"][0]["k"], "locked");
    assert_eq!(log["s"][0]["v"], true);
    assert_eq!(log["n"], "after maintenance");
}

#[test]
fn test_state_log_for_error_carries_message() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    rig.transport.clear_published();

    rig.controller.receive_command("lock yay");
    rig.controller.receive_command("data-log on");
    let logs = rig.transport.published_on(STATE_LOG_WEBHOOK);
    assert_eq!(logs.len(), 2);

    let log = json(&logs[1]);
    assert_eq!(log["t"], "error");
    assert_eq!(log["m"], "device is locked");
    assert_eq!(log["s"][0], serde_json::json!({}));
}

#[test]
fn test_state_logging_off_suppresses_logs_after_the_switch() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    rig.transport.clear_published();

    // The switch itself is always logged.
    assert_eq!(rig.controller.receive_command("state-log off"), 0);
    assert_eq!(rig.transport.published_on(STATE_LOG_WEBHOOK).len(), 1);

    rig.controller.receive_command("lock yay");
    rig.controller.receive_command("state-log off");
    assert_eq!(rig.transport.published_on(STATE_LOG_WEBHOOK).len(), 1);
}

#[test]
fn test_state_log_not_published_while_disconnected() {
    let mut rig = Rig::new().init(false);
    rig.controller.receive_command("lock yay");
    assert!(rig.transport.published_on(STATE_LOG_WEBHOOK).is_empty());
    assert!(!rig.controller.last_state_log().is_empty());
}

// ─── State report ───────────────────────────────────────────────────

#[test]
fn test_state_report_reflects_changes() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");

    rig.controller.receive_command("period 5 m");
    rig.controller.receive_command("setting yay");

    let posted = rig.transport.value(STATE_INFO_VARIABLE).expect("state value");
    assert_eq!(posted, rig.controller.state_report());

    let report = json(&posted);
    assert_eq!(report["version"], "logger 1.0");
    assert_eq!(report["mac"], "02:00:00:00:00:01");
    let entries = report["s"].as_array().expect("entries");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[3], serde_json::json!({"k":"log_period","v":300,"u":"s"}));
    assert_eq!(entries[4], serde_json::json!({"k":"setting","v":true}));
}

#[test]
fn test_state_report_assembly_is_pure() {
    let rig = Rig::new().init(false);
    let first = rig.controller.assemble_state_report().expect("report");
    let second = rig.controller.assemble_state_report().expect("report");
    assert_eq!(first, second);
    assert_eq!(rig.controller.state_report(), "{}");
}

#[test]
fn test_unchanged_command_keeps_report() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    let before = rig.controller.state_report().to_string();

    rig.clock.advance(5_000);
    assert_eq!(rig.controller.receive_command("lock nay"), 1);
    assert_eq!(rig.controller.state_report(), before);
}

// ─── Display ────────────────────────────────────────────────────────

#[test]
fn test_command_flashed_on_display() {
    let mut rig = Rig::new().init(false);
    rig.controller.receive_command("lock yay");
    rig.controller.receive_command("period 1 s");
    let flashes = rig.display.flashes();
    assert!(flashes.iter().any(|f| f == "OK: lock yay"));
    assert!(flashes.iter().any(|f| f == "LOCKERR: period 1 s"));
}

#[test]
fn test_command_callback_sees_result() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut rig = Rig::new().init(false);
    rig.controller
        .set_command_callback(move |command| sink.borrow_mut().push(command.code()));

    rig.controller.receive_command("data-log on");
    rig.controller.receive_command("data-log on");
    assert_eq!(*seen.borrow(), vec![0, 1]);
}
