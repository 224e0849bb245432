//! Integration test: startup and connection handling.
//!
//! Validates: connect request on the first tick, device name request once
//! connected, startup log and reports once the name is known, and
//! reconnection after a lost link.

use logger_common::consts::{DATA_INFO_VARIABLE, NAME_REQUEST_CHANNEL, STATE_INFO_VARIABLE, STATE_LOG_WEBHOOK};

use super::{Rig, json};

#[test]
fn test_startup_sequence() {
    let mut rig = Rig::new().init(false);
    rig.transport.set_auto_connect(false);

    rig.controller.update();
    assert_eq!(rig.transport.connect_requests(), 1);
    assert_eq!(rig.display.row(2), "Connect WiFi...");
    assert!(!rig.controller.is_connected());

    // Still connecting: no second request.
    rig.controller.update();
    assert_eq!(rig.transport.connect_requests(), 1);

    rig.transport.set_connected(true);
    rig.controller.update();
    assert!(rig.controller.is_connected());
    assert!(rig.controller.is_name_requested());
    assert_eq!(rig.transport.published_on(NAME_REQUEST_CHANNEL).len(), 1);
    assert!(!rig.controller.is_startup_logged());

    rig.controller.capture_name(NAME_REQUEST_CHANNEL, "field-7");
    assert_eq!(rig.controller.name(), "field-7");
    rig.controller.update();
    assert!(rig.controller.is_startup_logged());

    let logs = rig.transport.published_on(STATE_LOG_WEBHOOK);
    assert_eq!(logs.len(), 1);
    let log = json(&logs[0]);
    assert_eq!(log["id"], "field-7");
    assert_eq!(log["t"], "startup");

    let report = json(&rig.transport.value(STATE_INFO_VARIABLE).expect("state report"));
    assert_eq!(report["dt"], "2024-01-01 00:00:00 UTC");
    assert!(rig.transport.value(DATA_INFO_VARIABLE).is_some());

    // Startup is completed exactly once.
    rig.controller.update();
    assert_eq!(rig.transport.published_on(STATE_LOG_WEBHOOK).len(), 1);
}

#[test]
fn test_startup_not_logged_with_state_logging_off() {
    let mut rig = Rig::new().init(false);
    rig.controller.receive_command("state-log off");
    rig.connect("field-7");
    assert!(rig.transport.published_on(STATE_LOG_WEBHOOK).is_empty());
    assert_ne!(rig.controller.state_report(), "{}");
}

#[test]
fn test_long_names_are_truncated() {
    let mut rig = Rig::new().init(false);
    rig.connect("an-extremely-long-device-name");
    assert_eq!(rig.controller.name(), "an-extremely-long-d");
}

#[test]
fn test_reconnect_after_lost_link() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    assert_eq!(rig.transport.connect_requests(), 1);

    rig.transport.set_connected(false);
    rig.controller.update();
    assert!(!rig.controller.is_connected());

    rig.controller.update();
    assert_eq!(rig.transport.connect_requests(), 2);
    rig.controller.update();
    assert!(rig.controller.is_connected());

    // The name is not requested again and startup is not repeated.
    assert_eq!(rig.transport.published_on(NAME_REQUEST_CHANNEL).len(), 1);
    assert_eq!(rig.transport.published_on(STATE_LOG_WEBHOOK).len(), 1);
}

#[test]
fn test_name_callback() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    let mut rig = Rig::new().init(false);
    rig.controller
        .set_name_callback(move |name| sink.borrow_mut().push_str(name));
    rig.connect("field-7");
    assert_eq!(*seen.borrow(), "field-7");
}
