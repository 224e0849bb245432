//! Shared rig for the integration tests.

mod commands;
mod data_logging;
mod persistence;
mod startup;

use logger_common::consts::NAME_REQUEST_CHANNEL;
use logger_common::debug::DebugFlags;
use logger_controller::components::{ExampleComponent, SimulatedSensor};
use logger_controller::sim::{ConsoleDisplay, ConsoleTransport, ManualClock, MemoryStorage};
use logger_controller::{Collaborators, Controller};

/// Epoch of the manual clock: 2024-01-01 00:00:00 UTC.
pub const EPOCH: i64 = 1_704_067_200;

/// A controller plus handles on its collaborators.
pub struct Rig {
    pub controller: Controller,
    pub storage: MemoryStorage,
    pub transport: ConsoleTransport,
    pub clock: ManualClock,
    pub display: ConsoleDisplay,
}

impl Rig {
    /// Controller with the example component on fresh storage.
    pub fn new() -> Self {
        Self::on_storage(MemoryStorage::new(64), DebugFlags::empty())
    }

    /// Controller with the example component on `storage`, not yet initialized.
    pub fn on_storage(storage: MemoryStorage, debug: DebugFlags) -> Self {
        let transport = ConsoleTransport::new();
        let clock = ManualClock::new(EPOCH);
        let display = ConsoleDisplay::new();
        let mut controller = Controller::new(
            "logger 1.0",
            Collaborators {
                storage: Box::new(storage.clone()),
                transport: Box::new(transport.clone()),
                clock: Box::new(clock.clone()),
                display: Box::new(display.clone()),
            },
        )
        .expect("controller")
        .with_debug(debug);
        controller
            .add_component(Box::new(ExampleComponent::new("example")))
            .expect("example component");
        Self {
            controller,
            storage,
            transport,
            clock,
            display,
        }
    }

    /// Add the simulated sensor reading every `read_period_ms`.
    pub fn with_sensor(mut self, read_period_ms: u64) -> Self {
        self.controller
            .add_component(Box::new(SimulatedSensor::new("sensor", read_period_ms)))
            .expect("sensor");
        self
    }

    /// Initialize and return self.
    pub fn init(mut self, reset: bool) -> Self {
        self.controller.init(reset).expect("init");
        self
    }

    /// Run the connection flow until startup is complete.
    pub fn connect(&mut self, name: &str) {
        self.controller.update();
        self.controller.update();
        assert!(self.controller.is_name_requested());
        self.controller.capture_name(NAME_REQUEST_CHANNEL, name);
        self.controller.update();
        assert!(self.controller.is_startup_logged());
    }

    /// Advance the clock by `ms` in steps of `step` and tick after each.
    pub fn run_for(&mut self, ms: u64, step: u64) {
        let mut elapsed = 0;
        while elapsed < ms {
            self.clock.advance(step);
            self.controller.update();
            elapsed += step;
        }
    }
}

/// Parse a published payload.
pub fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("valid JSON")
}
