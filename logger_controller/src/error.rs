//! Error types for the controller core.
//!
//! Everything except `ControllerError` is recovered locally: it is logged,
//! shown on the display or reported through the command result, and the
//! controller keeps running.

use logger_common::device::StorageError;
use thiserror::Error;

/// Storage layout errors raised while registering participants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The participant's record does not fit in the remaining storage.
    #[error(
        "Participant '{participant}' needs {size} bytes at offset {offset}, storage capacity is {capacity}"
    )]
    CapacityExceeded {
        /// Participant identifier
        participant: String,
        /// Record size in bytes
        size: usize,
        /// Offset the record would have started at
        offset: usize,
        /// Storage capacity
        capacity: usize,
    },

    /// A participant with the same identifier is already registered.
    #[error("Participant '{0}' is already registered")]
    DuplicateParticipant(String),

    /// Two allocated ranges overlap. Fatal configuration error.
    #[error("Storage ranges of '{first}' and '{second}' overlap")]
    Overlap {
        /// Participant allocated first
        first: String,
        /// Participant allocated second
        second: String,
    },
}

/// Serialization errors for bounded payloads.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload would exceed its size limit.
    #[error("{what} too large: {size} bytes (limit {limit})")]
    PayloadTooLarge {
        /// Payload kind (e.g. "data log")
        what: &'static str,
        /// Size the payload would have had
        size: usize,
        /// Size limit
        limit: usize,
    },

    /// JSON serialization failed.
    #[error("JSON error: {source}")]
    Json {
        /// Source JSON error
        #[from]
        source: serde_json::Error,
    },
}

/// Reasons a payload did not reach the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// Transport not connected; nothing was sent.
    #[error("Transport not connected")]
    NotConnected,

    /// The transport reported a failed publish on `channel`.
    #[error("Publish to '{channel}' failed")]
    TransportFailure {
        /// Event channel
        channel: String,
    },

    /// Webhook debug mode: the payload went to a readable value instead.
    #[error("Publish to '{channel}' suppressed by webhook debugging")]
    Suppressed {
        /// Event channel
        channel: String,
    },

    /// There was nothing to publish.
    #[error("Nothing to publish on '{channel}'")]
    Empty {
        /// Event channel
        channel: String,
    },
}

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Storage layout invariant broken.
    #[error("Storage layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Persistent storage unusable.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_display() {
        let err = LayoutError::CapacityExceeded {
            participant: "sensor".to_string(),
            size: 32,
            offset: 100,
            capacity: 120,
        };
        let text = err.to_string();
        assert!(text.contains("sensor"));
        assert!(text.contains("120"));
    }

    #[test]
    fn payload_error_display() {
        let err = PayloadError::PayloadTooLarge {
            what: "data log",
            size: 700,
            limit: 622,
        };
        assert_eq!(err.to_string(), "data log too large: 700 bytes (limit 622)");
    }

    #[test]
    fn controller_error_from_layout() {
        let err: ControllerError = LayoutError::DuplicateParticipant("a".to_string()).into();
        assert!(matches!(err, ControllerError::Layout(_)));
    }
}
