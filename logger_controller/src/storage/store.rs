//! Versioned load/save/restore of one participant's record.
//!
//! Recovery policy: a stored record whose version byte differs from the
//! compiled-in `Record::VERSION` is discarded entirely and the in-memory
//! defaults are written back. There is no field-level migration.

use logger_common::device::{PersistentStorage, StorageError};
use tracing::{debug, error, info, warn};

use super::record::Record;

/// Owner of one participant's in-memory record and its storage range.
#[derive(Debug, Clone)]
pub struct StateStore<R: Record> {
    participant: String,
    offset: Option<usize>,
    record: R,
}

impl<R: Record> StateStore<R> {
    /// Create a store holding `record` as the in-memory default.
    ///
    /// The store is detached until `attach()` assigns its storage offset;
    /// a detached store never touches storage.
    pub fn new(participant: &str, record: R) -> Self {
        Self {
            participant: participant.to_string(),
            offset: None,
            record,
        }
    }

    /// Assign the storage offset allocated by the layout.
    pub fn attach(&mut self, offset: usize) {
        self.offset = Some(offset);
    }

    /// Storage offset, if attached.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Participant identifier.
    pub fn participant(&self) -> &str {
        &self.participant
    }

    /// Current in-memory record.
    #[inline]
    pub fn get(&self) -> &R {
        &self.record
    }

    /// Apply `change` to the record and persist it if `change` reports a
    /// modification. Returns what `change` returned.
    pub fn update(
        &mut self,
        storage: &mut dyn PersistentStorage,
        change: impl FnOnce(&mut R) -> bool,
    ) -> bool {
        let changed = change(&mut self.record);
        if changed {
            if let Err(e) = self.save(storage) {
                error!("Failed to persist state of '{}': {e}", self.participant);
            }
        }
        changed
    }

    /// Restore from storage, or persist the defaults when `force_reset` is
    /// set or the stored record is unusable. Returns true if restored.
    pub fn load(&mut self, storage: &mut dyn PersistentStorage, force_reset: bool) -> bool {
        if force_reset {
            info!("Resetting state of '{}' back to default values", self.participant);
            if let Err(e) = self.save(storage) {
                error!("Failed to save default state of '{}': {e}", self.participant);
            }
            false
        } else {
            debug!("Trying to restore state of '{}' from storage", self.participant);
            self.restore(storage)
        }
    }

    /// Write the in-memory record to its storage range unconditionally.
    ///
    /// # Errors
    /// Propagates the storage error; a detached store returns `Ok(())`.
    pub fn save(&mut self, storage: &mut dyn PersistentStorage) -> Result<(), StorageError> {
        let Some(offset) = self.offset else {
            debug!("State of '{}' not persisted (no storage range)", self.participant);
            return Ok(());
        };
        storage.write(offset, &self.record.encode())?;
        debug!("State of '{}' saved at offset {offset}", self.participant);
        Ok(())
    }

    /// Replace the in-memory record with the stored one if its version
    /// matches `R::VERSION`. Otherwise keep the defaults, write them back and
    /// return false.
    pub fn restore(&mut self, storage: &mut dyn PersistentStorage) -> bool {
        let Some(offset) = self.offset else {
            return false;
        };

        let restored = match storage.read(offset, R::SIZE) {
            Ok(bytes) => {
                let stored_version = bytes.first().copied().unwrap_or_default();
                if stored_version != R::VERSION {
                    info!(
                        "Could not restore state of '{}' (found version {stored_version} instead of {}), sticking with defaults",
                        self.participant,
                        R::VERSION
                    );
                    None
                } else {
                    let decoded = R::decode(&bytes);
                    if decoded.is_none() {
                        warn!(
                            "Stored state of '{}' has version {stored_version} but malformed content, sticking with defaults",
                            self.participant
                        );
                    }
                    decoded
                }
            }
            Err(e) => {
                error!("Failed to read state of '{}': {e}", self.participant);
                None
            }
        };

        match restored {
            Some(record) => {
                self.record = record;
                info!(
                    "Restored state of '{}' from storage (version {})",
                    self.participant,
                    R::VERSION
                );
                true
            }
            None => {
                if let Err(e) = self.save(storage) {
                    error!("Failed to save default state of '{}': {e}", self.participant);
                }
                false
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryStorage;
    use crate::storage::record::{ControllerState, LoggingType, CONTROLLER_STATE_VERSION};

    fn attached(offset: usize) -> StateStore<ControllerState> {
        let mut store = StateStore::new("controller", ControllerState::default());
        store.attach(offset);
        store
    }

    #[test]
    fn restore_from_erased_storage_saves_defaults() {
        let mut storage = MemoryStorage::new(64);
        let mut store = attached(0);

        assert!(!store.restore(&mut storage));
        assert_eq!(*store.get(), ControllerState::default());

        // Defaults were written back.
        let bytes = storage.read(0, ControllerState::SIZE).unwrap();
        assert_eq!(bytes, ControllerState::default().encode());
    }

    #[test]
    fn restore_matching_version_replaces_record() {
        let mut storage = MemoryStorage::new(64);
        let stored = ControllerState {
            locked: true,
            data_logging: true,
            data_logging_period: 42,
            data_logging_type: LoggingType::ByEvent,
            ..Default::default()
        };
        storage.write(5, &stored.encode()).unwrap();

        let mut store = attached(5);
        assert!(store.restore(&mut storage));
        assert_eq!(*store.get(), stored);
    }

    #[test]
    fn restore_mismatched_version_then_roundtrip() {
        let mut storage = MemoryStorage::new(64);
        let stale = ControllerState {
            version: CONTROLLER_STATE_VERSION - 1,
            locked: true,
            ..Default::default()
        };
        storage.write(0, &stale.encode()).unwrap();

        let mut store = attached(0);
        assert!(!store.restore(&mut storage));
        assert!(!store.get().locked);

        // save + restore now round-trips exactly.
        store.update(&mut storage, |s| {
            s.state_logging = false;
            true
        });
        let mut other = attached(0);
        assert!(other.restore(&mut storage));
        assert_eq!(other.get(), store.get());
    }

    #[test]
    fn load_force_reset_overwrites_stored_state() {
        let mut storage = MemoryStorage::new(64);
        let stored = ControllerState {
            locked: true,
            ..Default::default()
        };
        storage.write(0, &stored.encode()).unwrap();

        let mut store = attached(0);
        assert!(!store.load(&mut storage, true));
        assert!(!store.get().locked);
        let bytes = storage.read(0, ControllerState::SIZE).unwrap();
        assert_eq!(ControllerState::decode(&bytes), Some(ControllerState::default()));
    }

    #[test]
    fn update_persists_only_on_change() {
        let mut storage = MemoryStorage::new(64);
        let mut store = attached(0);

        assert!(!store.update(&mut storage, |_| false));
        assert_eq!(storage.write_count(), 0);

        assert!(store.update(&mut storage, |s| {
            s.locked = true;
            true
        }));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn detached_store_never_touches_storage() {
        let mut storage = MemoryStorage::new(64);
        let mut store = StateStore::new("orphan", ControllerState::default());
        assert!(!store.load(&mut storage, false));
        assert!(store.save(&mut storage).is_ok());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn read_error_falls_back_to_defaults() {
        let mut storage = MemoryStorage::new(4);
        let mut store = attached(0);
        assert!(!store.restore(&mut storage));
        assert_eq!(*store.get(), ControllerState::default());
    }
}
