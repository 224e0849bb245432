//! Accumulated readings.
//!
//! Each `DataSeries` collects the readings of one measured variable between
//! two data logs. A sensor producing several values per sample registers one
//! series per value. The `DataBuffer` owns all series in registration order;
//! that order is also the order entries appear in data logs.

use serde::Serialize;
use tracing::warn;

use crate::json::{Fragment, fragment};
use crate::storage::record::LoggingType;

/// One sensor sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Device time of the sample [ms since start].
    pub timestamp_ms: u64,
    /// Measured value.
    pub value: f64,
}

/// Round `value` to `decimals` decimal places.
#[inline]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}

#[derive(Serialize)]
struct LogEntry<'a> {
    k: &'a str,
    v: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<f64>,
    n: usize,
    u: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<u64>,
}

#[derive(Serialize)]
struct InfoEntry<'a> {
    k: &'a str,
    v: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    a: Option<f64>,
    n: usize,
    u: &'a str,
}

/// Readings of one variable since the last data log.
#[derive(Debug, Clone)]
pub struct DataSeries {
    variable: String,
    unit: String,
    decimals: u8,
    readings: Vec<Reading>,
    latest: Option<Reading>,
}

impl DataSeries {
    /// Create an empty series.
    pub fn new(variable: &str, unit: &str, decimals: u8) -> Self {
        Self {
            variable: variable.to_string(),
            unit: unit.to_string(),
            decimals,
            readings: Vec::new(),
            latest: None,
        }
    }

    /// Variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Unit label.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Append a reading.
    pub fn add(&mut self, value: f64, timestamp_ms: u64) {
        let reading = Reading {
            timestamp_ms,
            value,
        };
        self.readings.push(reading);
        self.latest = Some(reading);
    }

    /// Number of readings since the last clear.
    #[inline]
    pub fn n(&self) -> usize {
        self.readings.len()
    }

    /// Readings since the last clear, oldest first.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Most recent reading, kept across partial clears.
    pub fn latest(&self) -> Option<Reading> {
        self.latest
    }

    /// Mean value, if any readings.
    pub fn mean(&self) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        let sum: f64 = self.readings.iter().map(|r| r.value).sum();
        Some(sum / self.readings.len() as f64)
    }

    /// Sample standard deviation, if at least two readings.
    pub fn std_dev(&self) -> Option<f64> {
        let n = self.readings.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let ss: f64 = self
            .readings
            .iter()
            .map(|r| (r.value - mean) * (r.value - mean))
            .sum();
        Some((ss / (n - 1) as f64).sqrt())
    }

    /// Representative time of the accumulated readings (mean timestamp).
    pub fn data_time(&self) -> Option<u64> {
        if self.readings.is_empty() {
            return None;
        }
        let sum: u128 = self.readings.iter().map(|r| u128::from(r.timestamp_ms)).sum();
        u64::try_from(sum / self.readings.len() as u128).ok()
    }

    /// Drop accumulated readings. `all` also forgets the latest reading.
    pub fn clear(&mut self, all: bool) {
        self.readings.clear();
        if all {
            self.latest = None;
        }
    }

    /// Data log entry for the accumulated readings, or `None` if there is
    /// nothing to report.
    ///
    /// With `now_ms` set, the entry carries its own time offset (`to`)
    /// instead of relying on the chunk's global offset.
    pub fn log_fragment(&self, now_ms: Option<u64>) -> Option<Fragment> {
        let mean = self.mean()?;
        let to = match now_ms {
            Some(now) => Some(now.saturating_sub(self.data_time()?)),
            None => None,
        };
        Some(fragment(&LogEntry {
            k: &self.variable,
            v: round_to(mean, self.decimals),
            s: self.std_dev().map(|s| round_to(s, self.decimals)),
            n: self.n(),
            u: &self.unit,
            to,
        }))
    }

    /// Summary entry for the data information value.
    pub fn info_fragment(&self) -> Fragment {
        fragment(&InfoEntry {
            k: &self.variable,
            v: self.latest.map(|r| round_to(r.value, self.decimals)),
            a: self.mean().map(|m| round_to(m, self.decimals)),
            n: self.n(),
            u: &self.unit,
        })
    }
}

/// All data series of the device.
#[derive(Debug, Clone, Default)]
pub struct DataBuffer {
    series: Vec<DataSeries>,
}

impl DataBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series. Returns its index.
    pub fn add_series(&mut self, variable: &str, unit: &str, decimals: u8) -> usize {
        self.series.push(DataSeries::new(variable, unit, decimals));
        self.series.len() - 1
    }

    /// All series in registration order.
    pub fn series(&self) -> &[DataSeries] {
        &self.series
    }

    /// Series by index.
    pub fn get(&self, idx: usize) -> Option<&DataSeries> {
        self.series.get(idx)
    }

    /// Number of registered series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if no series are registered.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Append a reading to series `idx`. Returns false for an unknown index.
    pub fn add_reading(&mut self, idx: usize, value: f64, timestamp_ms: u64) -> bool {
        match self.series.get_mut(idx) {
            Some(series) => {
                series.add(value, timestamp_ms);
                true
            }
            None => {
                warn!("Reading for unknown data series {idx} dropped");
                false
            }
        }
    }

    /// Number of readings of the primary (first) series.
    pub fn primary_count(&self) -> usize {
        self.series.first().map_or(0, DataSeries::n)
    }

    /// Whether a data log is due.
    ///
    /// `ByTime`: more than `period` seconds elapsed since the last log.
    /// `ByEvent`: the primary series holds at least `period` readings.
    pub fn is_due(&self, logging_type: LoggingType, period: i32, elapsed_ms: u64) -> bool {
        let period = u64::try_from(period).unwrap_or(0);
        match logging_type {
            LoggingType::ByTime => elapsed_ms > period.saturating_mul(1000),
            LoggingType::ByEvent => {
                // Period may be zero or negative when set through the API or
                // read back from storage; an empty series is never due.
                let count = self.primary_count() as u64;
                count > 0 && count >= period
            }
        }
    }

    /// Clear every series. `all` also forgets the latest readings.
    pub fn clear(&mut self, all: bool) {
        for series in &mut self.series {
            series.clear(all);
        }
    }

    /// Summary entries of all series.
    pub fn info_fragments(&self) -> Vec<Fragment> {
        self.series.iter().map(DataSeries::info_fragment).collect()
    }
}
