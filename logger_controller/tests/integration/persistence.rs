//! Integration test: persistence across restarts.
//!
//! Validates: restore of controller and component state on restart, default
//! fallback on version mismatch and reset requests, capacity exclusion of
//! components that do not fit, and the file-backed storage image.

use logger_common::debug::DebugFlags;
use logger_controller::components::ExampleComponent;
use logger_controller::sim::{ConsoleDisplay, ConsoleTransport, FileStorage, ManualClock, MemoryStorage};
use logger_common::device::PersistentStorage;
use logger_controller::storage::{ControllerState, LoggingType, Record};
use logger_controller::{Collaborators, Controller, LayoutError};

use super::Rig;

fn restart(storage: &MemoryStorage, reset: bool) -> Rig {
    Rig::on_storage(storage.clone(), DebugFlags::empty()).init(reset)
}

// ─── Restore ────────────────────────────────────────────────────────

#[test]
fn test_fresh_storage_starts_from_defaults() {
    let storage = MemoryStorage::new(64);
    let rig = restart(&storage, false);
    assert_eq!(*rig.controller.state(), ControllerState::default());
    // Unusable records are overwritten with the defaults.
    assert_eq!(storage.snapshot()[0], ControllerState::default().version);
}

#[test]
fn test_state_survives_restart() {
    let storage = MemoryStorage::new(64);
    {
        let mut rig = restart(&storage, false);
        assert_eq!(rig.controller.receive_command("data-log on"), 0);
        assert_eq!(rig.controller.receive_command("reads 25"), 0);
        assert_eq!(rig.controller.receive_command("setting yay"), 0);
        assert_eq!(rig.controller.receive_command("lock yay"), 0);
    }

    let mut rig = restart(&storage, false);
    let state = rig.controller.state();
    assert!(state.locked);
    assert!(state.data_logging);
    assert_eq!(state.data_logging_period, 25);
    assert_eq!(state.data_logging_type, LoggingType::ByEvent);

    // Component state came back too: unlocking and repeating the setting is a no-op.
    assert_eq!(rig.controller.receive_command("lock nay"), 0);
    assert_eq!(rig.controller.receive_command("setting yay"), 1);
}

#[test]
fn test_reset_request_overrides_stored_state() {
    let storage = MemoryStorage::new(64);
    {
        let mut rig = restart(&storage, false);
        rig.controller.receive_command("lock yay");
        rig.controller.receive_command("setting yay");
    }

    let mut rig = restart(&storage, true);
    assert!(rig.controller.was_reset());
    assert_eq!(*rig.controller.state(), ControllerState::default());
    assert_eq!(rig.controller.receive_command("setting nay"), 1);
    assert!(rig.display.flashes().iter().any(|f| f == "Resetting..."));

    // The defaults were written back, so the next plain start keeps them.
    let rig = restart(&storage, false);
    assert!(!rig.controller.state().locked);
}

#[test]
fn test_reset_state_command_takes_effect_on_next_startup() {
    let storage = MemoryStorage::new(64);
    {
        let mut rig = restart(&storage, false);
        rig.controller.receive_command("period 1 h");
        assert_eq!(rig.controller.receive_command("reset state"), 0);
        // The running controller keeps its values.
        assert_eq!(rig.controller.state().data_logging_period, 3600);
    }

    let rig = restart(&storage, false);
    assert_eq!(*rig.controller.state(), ControllerState::default());
}

#[test]
fn test_version_mismatch_falls_back_to_defaults() {
    let storage = MemoryStorage::new(64);
    {
        let mut rig = restart(&storage, false);
        rig.controller.receive_command("state-log off");
    }
    let mut raw = storage.clone();
    raw.write(0, &[ControllerState::VERSION + 1]).expect("write");

    let rig = restart(&storage, false);
    assert!(rig.controller.state().state_logging);
}

// ─── Layout ─────────────────────────────────────────────────────────

#[test]
fn test_component_exceeding_capacity_is_excluded() {
    let storage = MemoryStorage::new(ControllerState::SIZE + 1);
    let mut controller = Controller::new(
        "logger 1.0",
        Collaborators {
            storage: Box::new(storage),
            transport: Box::new(ConsoleTransport::new()),
            clock: Box::new(ManualClock::new(0)),
            display: Box::new(ConsoleDisplay::new()),
        },
    )
    .expect("controller");

    let result = controller.add_component(Box::new(ExampleComponent::new("example")));
    assert!(matches!(result, Err(LayoutError::CapacityExceeded { .. })));
    assert_eq!(controller.component_count(), 0);

    controller.init(false).expect("init");
    assert_eq!(
        controller.receive_command("setting yay"),
        logger_controller::CommandResult::UnknownCommand.code()
    );
}

#[test]
fn test_duplicate_component_is_refused() {
    let mut rig = Rig::new();
    let result = rig
        .controller
        .add_component(Box::new(ExampleComponent::new("example")));
    assert!(matches!(result, Err(LayoutError::DuplicateParticipant(_))));
    assert_eq!(rig.controller.component_count(), 1);
}

// ─── File image ─────────────────────────────────────────────────────

#[test]
fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state").join("logger_state.bin");

    let start = |reset: bool| {
        let storage = FileStorage::open(&path, 64).expect("open");
        let mut controller = Controller::new(
            "logger 1.0",
            Collaborators {
                storage: Box::new(storage),
                transport: Box::new(ConsoleTransport::new()),
                clock: Box::new(ManualClock::new(0)),
                display: Box::new(ConsoleDisplay::new()),
            },
        )
        .expect("controller");
        controller
            .add_component(Box::new(ExampleComponent::new("example")))
            .expect("example");
        controller.init(reset).expect("init");
        controller
    };

    {
        let mut controller = start(false);
        assert_eq!(controller.receive_command("period 15 m"), 0);
    }
    assert_eq!(std::fs::metadata(&path).expect("image").len(), 64);

    let controller = start(false);
    assert_eq!(controller.state().data_logging_period, 900);
}
