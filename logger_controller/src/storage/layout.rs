//! Persistent storage layout.
//!
//! Every participant (the controller and each registered component) owns one
//! contiguous byte range of the storage region. Ranges are handed out in
//! registration order, back to back, starting with the controller's record at
//! `CONTROLLER_STATE_ADDRESS`.
//!
//! Registration order is part of the persisted layout: registering components
//! in a different order makes their previously stored records unreadable (the
//! version check then resets them to defaults).

use logger_common::consts::CONTROLLER_STATE_ADDRESS;
use tracing::{error, info};

use crate::error::LayoutError;

/// One participant's storage range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Participant identifier.
    pub participant: String,
    /// First byte of the range.
    pub offset: usize,
    /// Length of the range in bytes.
    pub size: usize,
}

impl Allocation {
    /// One past the last byte of the range.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Returns true if the two ranges share at least one byte.
    #[inline]
    pub fn overlaps(&self, other: &Allocation) -> bool {
        self.size > 0 && other.size > 0 && self.offset < other.end() && other.offset < self.end()
    }
}

/// Ordered list of storage allocations within a fixed capacity.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    capacity: usize,
    allocations: Vec<Allocation>,
    next_offset: usize,
}

impl StorageLayout {
    /// Create a layout holding the controller's own record.
    ///
    /// # Errors
    /// Returns `LayoutError::CapacityExceeded` if the controller record alone
    /// does not fit.
    pub fn new(capacity: usize, controller_id: &str, controller_size: usize) -> Result<Self, LayoutError> {
        let mut layout = Self {
            capacity,
            allocations: Vec::new(),
            next_offset: CONTROLLER_STATE_ADDRESS,
        };
        layout.register(controller_id, controller_size)?;
        Ok(layout)
    }

    /// Assign the next free range of `size` bytes to `participant`.
    ///
    /// On error nothing is recorded: the next registration is offered the
    /// same offset.
    ///
    /// # Errors
    /// - `LayoutError::DuplicateParticipant` if the id is already registered
    /// - `LayoutError::CapacityExceeded` if the range would end past the capacity
    pub fn register(&mut self, participant: &str, size: usize) -> Result<usize, LayoutError> {
        if self.allocation(participant).is_some() {
            error!("Participant '{participant}' is already registered, ignoring");
            return Err(LayoutError::DuplicateParticipant(participant.to_string()));
        }

        let offset = self.next_offset;
        let fits = offset
            .checked_add(size)
            .is_some_and(|end| end <= self.capacity);
        if !fits {
            error!(
                "Participant '{participant}' state ({size} bytes at {offset}) would exceed storage size {}, not registered",
                self.capacity
            );
            return Err(LayoutError::CapacityExceeded {
                participant: participant.to_string(),
                size,
                offset,
                capacity: self.capacity,
            });
        }

        info!("Storage range {offset}..{} assigned to '{participant}'", offset + size);
        self.allocations.push(Allocation {
            participant: participant.to_string(),
            offset,
            size,
        });
        self.next_offset = offset + size;
        Ok(offset)
    }

    /// Look up a participant's allocation.
    pub fn allocation(&self, participant: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.participant == participant)
    }

    /// All allocations in registration order.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Storage capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Offset the next registration would receive.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Bytes still available for registrations.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.next_offset)
    }

    /// Check the layout invariants: ranges are within capacity and pairwise
    /// disjoint.
    ///
    /// # Errors
    /// Returns `LayoutError::Overlap` for the first overlapping pair, or
    /// `LayoutError::CapacityExceeded` for a range past the capacity.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (i, a) in self.allocations.iter().enumerate() {
            if a.end() > self.capacity {
                return Err(LayoutError::CapacityExceeded {
                    participant: a.participant.clone(),
                    size: a.size,
                    offset: a.offset,
                    capacity: self.capacity,
                });
            }
            if let Some(b) = self.allocations[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(LayoutError::Overlap {
                    first: a.participant.clone(),
                    second: b.participant.clone(),
                });
            }
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
