//! Sensor readings and data log chunking.

pub mod chunker;
pub mod series;

pub use chunker::LogChunker;
pub use series::{DataBuffer, DataSeries, Reading};
