//! Bundled components.

pub mod example;
pub mod sensor;

pub use example::{ExampleComponent, ExampleState};
pub use sensor::SimulatedSensor;
