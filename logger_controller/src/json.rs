//! JSON fragments.
//!
//! Logs and reports are assembled from pre-serialized fragments so their
//! size can be checked before they are combined. A fragment is a
//! `serde_json::value::RawValue`: valid JSON that is embedded verbatim.

use serde::Serialize;
use serde_json::value::{RawValue, to_raw_value};
use tracing::error;

/// One pre-serialized JSON value.
pub type Fragment = Box<RawValue>;

/// Serialize `value` into a fragment.
///
/// Serialization of the plain structs used here cannot fail in practice; if
/// it does, the error is logged and `null` is returned so the surrounding
/// document stays valid JSON.
pub fn fragment<T: Serialize + ?Sized>(value: &T) -> Fragment {
    to_raw_value(value).unwrap_or_else(|e| {
        error!("Failed to serialize JSON fragment: {e}");
        RawValue::NULL.to_owned()
    })
}

/// `{"k": key, "v": value, "u": unit}` state entry.
#[derive(Debug, Serialize)]
pub struct KeyValue<'a, V: Serialize> {
    /// Key
    pub k: &'a str,
    /// Value
    pub v: V,
    /// Optional unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u: Option<&'a str>,
}

/// Build a key/value fragment without unit.
pub fn key_value<V: Serialize>(key: &str, value: V) -> Fragment {
    fragment(&KeyValue {
        k: key,
        v: value,
        u: None,
    })
}

/// Build a key/value fragment with unit.
pub fn key_value_unit<V: Serialize>(key: &str, value: V, unit: &str) -> Fragment {
    fragment(&KeyValue {
        k: key,
        v: value,
        u: Some(unit),
    })
}

/// Serialized length of a list of fragments joined by commas (without brackets).
pub fn joined_len(fragments: &[Fragment]) -> usize {
    let content: usize = fragments.iter().map(|f| f.get().len()).sum();
    content + fragments.len().saturating_sub(1)
}
