//! Persistent state: storage layout, record encoding and versioned stores.

pub mod layout;
pub mod record;
pub mod store;

pub use layout::{Allocation, StorageLayout};
pub use record::{ControllerState, LoggingType, Record};
pub use store::StateStore;
