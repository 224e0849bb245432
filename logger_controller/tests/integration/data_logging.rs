//! Integration test: data logging cycle.
//!
//! Validates: due check by time and by read count, chunked data logs on the
//! wire, data information refresh, partial clearing after each cycle and
//! the webhook debugging mode.

use logger_common::consts::{DATA_INFO_VARIABLE, DATA_LOG_WEBHOOK, STATE_LOG_WEBHOOK};
use logger_common::debug::DebugFlags;
use logger_controller::PayloadLimits;
use logger_controller::sim::MemoryStorage;

use super::{Rig, json};

fn logging_rig(period: &str) -> Rig {
    let mut rig = Rig::new().with_sensor(1000).init(false);
    rig.connect("field-7");
    assert_eq!(rig.controller.receive_command("data-log on"), 0);
    assert_eq!(rig.controller.receive_command(period), 0);
    rig.transport.clear_published();
    rig
}

// ─── Due check ──────────────────────────────────────────────────────

#[test]
fn test_time_based_cycle() {
    let mut rig = logging_rig("period 3 s");

    rig.run_for(3000, 500);
    assert!(rig.transport.published_on(DATA_LOG_WEBHOOK).is_empty());

    // Readings at 1, 2 and 3 s; the cycle fires on the first tick past 3 s.
    rig.run_for(500, 500);
    let logs = rig.transport.published_on(DATA_LOG_WEBHOOK);
    assert_eq!(logs.len(), 1);

    let log = json(&logs[0]);
    assert_eq!(log["id"], "field-7");
    assert_eq!(log["to"], 1500);
    let entry = &log["d"][0];
    assert_eq!(entry["k"], "temp");
    assert_eq!(entry["n"], 3);
    assert_eq!(entry["u"], "C");
    assert!(entry["s"].is_number());

    assert!(rig.display.flashes().iter().any(|f| f == "INFO: data log sent"));
}

#[test]
fn test_data_information_refreshed_before_clear() {
    let mut rig = logging_rig("period 3 s");
    rig.run_for(3500, 500);

    let info = json(&rig.transport.value(DATA_INFO_VARIABLE).expect("data information"));
    let entry = &info["d"][0];
    assert_eq!(entry["k"], "temp");
    assert_eq!(entry["n"], 3);
    assert!(entry["v"].is_number());
    assert!(entry["a"].is_number());

    // Partial clear: counts restart, the latest value is kept.
    let series = &rig.controller.data().series()[0];
    assert_eq!(series.n(), 0);
    assert!(series.latest().is_some());
}

#[test]
fn test_read_count_cycle() {
    let mut rig = logging_rig("reads 3");

    rig.run_for(2000, 1000);
    assert!(rig.transport.published_on(DATA_LOG_WEBHOOK).is_empty());

    rig.run_for(1000, 1000);
    let logs = rig.transport.published_on(DATA_LOG_WEBHOOK);
    assert_eq!(logs.len(), 1);
    assert_eq!(json(&logs[0])["d"][0]["n"], 3);
    assert_eq!(rig.controller.data().primary_count(), 0);
}

#[test]
fn test_cycle_without_data_logging_only_clears() {
    let mut rig = Rig::new().with_sensor(1000).init(false);
    rig.connect("field-7");
    assert_eq!(rig.controller.receive_command("period 2 s"), 0);

    rig.run_for(3000, 500);
    assert!(rig.transport.published_on(DATA_LOG_WEBHOOK).is_empty());
    assert!(rig.controller.data().primary_count() < 2);
    assert!(rig.transport.value(DATA_INFO_VARIABLE).is_some());
}

// ─── Chunking ───────────────────────────────────────────────────────

fn with_series(rig: &mut Rig, names: &[&str]) {
    for name in names {
        let idx = rig.controller.data_mut().add_series(name, "C", 1);
        rig.controller.data_mut().add_reading(idx, 1.0, 0);
    }
}

fn small_limits(data_log: usize) -> PayloadLimits {
    PayloadLimits {
        data_log,
        ..PayloadLimits::default()
    }
}

#[test]
fn test_series_split_across_chunks_in_order() {
    let mut rig = Rig::new();
    // Each entry is 32 bytes: two fit below the 80 byte cutoff, three do not.
    rig.controller = rig.controller.with_limits(small_limits(130));
    let mut rig = rig.init(false);
    rig.connect("field-7");
    rig.controller.receive_command("data-log on");
    with_series(&mut rig, &["a1", "a2", "a3", "a4"]);
    rig.transport.clear_published();

    rig.controller.log_data();

    let logs = rig.transport.published_on(DATA_LOG_WEBHOOK);
    assert_eq!(logs.len(), 2);
    let keys: Vec<String> = logs
        .iter()
        .flat_map(|log| {
            json(log)["d"]
                .as_array()
                .expect("entries")
                .iter()
                .map(|e| e["k"].as_str().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(keys, ["a1", "a2", "a3", "a4"]);
    assert!(logs.iter().all(|log| log.len() <= 130));
}

#[test]
fn test_oversized_entry_is_skipped() {
    let mut rig = Rig::new();
    rig.controller = rig.controller.with_limits(small_limits(130));
    let mut rig = rig.init(false);
    rig.connect("field-7");
    rig.controller.receive_command("data-log on");
    let long_name = "a".repeat(120);
    with_series(&mut rig, &["a1", long_name.as_str(), "a3"]);
    rig.transport.clear_published();

    rig.controller.log_data();

    let logs = rig.transport.published_on(DATA_LOG_WEBHOOK);
    assert_eq!(logs.len(), 2);
    assert_eq!(json(&logs[0])["d"][0]["k"], "a1");
    assert_eq!(json(&logs[1])["d"][0]["k"], "a3");
    assert!(rig.display.flashes().iter().any(|f| f == "ERR: datalog too big"));
}

#[test]
fn test_long_entry_sent_alone_when_it_fits() {
    let mut rig = Rig::new();
    // 85 byte entry: above the 80 byte cutoff, below the 130 byte chunk limit.
    rig.controller = rig.controller.with_limits(small_limits(130));
    let mut rig = rig.init(false);
    rig.connect("field-7");
    rig.controller.receive_command("data-log on");
    with_series(
        &mut rig,
        &["a1", "a-variable-name-far-too-long-for-any-chunk-of-this-size", "a3"],
    );
    rig.transport.clear_published();

    rig.controller.log_data();

    let logs = rig.transport.published_on(DATA_LOG_WEBHOOK);
    assert_eq!(logs.len(), 3);
    assert_eq!(
        json(&logs[1])["d"][0]["k"],
        "a-variable-name-far-too-long-for-any-chunk-of-this-size"
    );
    assert!(logs.iter().all(|log| log.len() <= 130));
    assert!(!rig.display.flashes().iter().any(|f| f == "ERR: datalog too big"));
}

#[test]
fn test_failed_publish_is_not_retried() {
    let mut rig = Rig::new();
    rig.controller = rig.controller.with_limits(small_limits(130));
    let mut rig = rig.init(false);
    rig.connect("field-7");
    rig.controller.receive_command("data-log on");
    with_series(&mut rig, &["a1", "a2", "a3"]);
    rig.transport.clear_published();
    rig.transport.set_publish_ok(false);

    rig.controller.log_data();

    assert_eq!(rig.transport.published_on(DATA_LOG_WEBHOOK).len(), 2);
    assert!(rig.display.flashes().iter().any(|f| f == "ERR: data log error"));
}

#[test]
fn test_empty_cycle_publishes_nothing() {
    let mut rig = Rig::new().init(false);
    rig.connect("field-7");
    rig.controller.receive_command("data-log on");
    with_series(&mut rig, &["a1"]);
    rig.controller.reset_data();
    rig.transport.clear_published();

    rig.controller.log_data();
    assert!(rig.transport.published_on(DATA_LOG_WEBHOOK).is_empty());
}

// ─── Webhook debugging ──────────────────────────────────────────────

#[test]
fn test_webhook_mode_exposes_logs_instead_of_publishing() {
    let mut rig = Rig::on_storage(MemoryStorage::new(64), DebugFlags::WEBHOOKS)
        .with_sensor(1000)
        .init(false);
    assert_eq!(rig.transport.value(STATE_LOG_WEBHOOK).as_deref(), Some("{}"));
    assert_eq!(rig.transport.value(DATA_LOG_WEBHOOK).as_deref(), Some("{}"));

    rig.connect("field-7");
    rig.controller.receive_command("state-log off");
    rig.controller.receive_command("lock yay");

    // State logs are still assembled with state logging off.
    let state_log = json(&rig.transport.value(STATE_LOG_WEBHOOK).expect("state log"));
    assert_eq!(state_log["s"][0]["k"], "locked");

    // Data logs are assembled with data logging off.
    rig.controller.receive_command("lock nay");
    rig.controller.receive_command("period 2 s");
    rig.run_for(2500, 500);
    let data_log = json(&rig.transport.value(DATA_LOG_WEBHOOK).expect("data log"));
    assert_eq!(data_log["d"][0]["k"], "temp");

    assert!(rig.transport.published_on(STATE_LOG_WEBHOOK).is_empty());
    assert!(rig.transport.published_on(DATA_LOG_WEBHOOK).is_empty());
}
