//! Simulated sensor.
//!
//! Takes one temperature reading every `read_period_ms` and appends it to
//! its data series. Values follow a slow deterministic wave so host runs and
//! tests are reproducible. The sensor has no persistent state.

use logger_common::device::{PersistentStorage, StorageError};
use tracing::debug;

use crate::command::Command;
use crate::component::Component;
use crate::data::DataBuffer;
use crate::json::Fragment;

/// Simulated temperature sensor.
#[derive(Debug)]
pub struct SimulatedSensor {
    id: String,
    read_period_ms: u64,
    last_read_ms: Option<u64>,
    series: Option<usize>,
    reads: u64,
}

impl SimulatedSensor {
    /// Create a sensor reading every `read_period_ms` milliseconds.
    pub fn new(id: &str, read_period_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            read_period_ms: read_period_ms.max(1),
            last_read_ms: None,
            series: None,
            reads: 0,
        }
    }

    /// Number of readings taken so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn sample(&self) -> f64 {
        20.0 + 2.5 * (self.reads as f64 / 10.0).sin()
    }
}

impl Component for SimulatedSensor {
    fn id(&self) -> &str {
        &self.id
    }

    fn state_size(&self) -> usize {
        0
    }

    fn attach_storage(&mut self, _offset: usize) {}

    fn init(&mut self, data: &mut DataBuffer) {
        self.series = Some(data.add_series("temp", "C", 2));
    }

    fn load_state(&mut self, _storage: &mut dyn PersistentStorage, _reset: bool) {}

    fn save_state(&mut self, _storage: &mut dyn PersistentStorage) -> Result<(), StorageError> {
        Ok(())
    }

    fn restore_state(&mut self, _storage: &mut dyn PersistentStorage) -> bool {
        true
    }

    fn parse_command(&mut self, _command: &mut Command, _storage: &mut dyn PersistentStorage) -> bool {
        false
    }

    fn assemble_state_fragment(&self) -> Vec<Fragment> {
        Vec::new()
    }

    fn tick(&mut self, now_ms: u64, data: &mut DataBuffer) {
        let Some(series) = self.series else {
            return;
        };
        let due = self
            .last_read_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.read_period_ms);
        if !due {
            return;
        }
        let value = self.sample();
        if data.add_reading(series, value, now_ms) {
            debug!("Sensor '{}' read {value:.2} at {now_ms} ms", self.id);
        }
        self.reads += 1;
        self.last_read_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_once_per_period() {
        let mut data = DataBuffer::new();
        let mut sensor = SimulatedSensor::new("sensor", 1000);
        sensor.init(&mut data);

        for now in (0..=3000).step_by(100) {
            sensor.tick(now, &mut data);
        }
        assert_eq!(sensor.reads(), 4);
        assert_eq!(data.primary_count(), 4);
    }

    #[test]
    fn no_reading_before_init() {
        let mut data = DataBuffer::new();
        let mut sensor = SimulatedSensor::new("sensor", 1000);
        sensor.tick(0, &mut data);
        assert_eq!(sensor.reads(), 0);
    }
}
