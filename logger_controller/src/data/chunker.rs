//! Bounded data log chunks.
//!
//! Pending data series are packed into one or more JSON chunks
//! `{"id","to"?,"d":[...]}`, each at most `max_bytes` long. Packing is a
//! single in-order greedy pass: an entry that does not fit ends the chunk and
//! opens the next one. Entries are never reordered.
//!
//! The watermark is the index of the last series included in any chunk of
//! the current cycle. It is advanced when a chunk is assembled, not when it
//! is published, so a failed publish is not retried within the cycle.

use logger_common::consts::DATA_LOG_RESERVED_MARGIN;
use serde::Serialize;
use tracing::debug;

use super::series::DataBuffer;
use crate::error::PayloadError;
use crate::json::{Fragment, joined_len};

#[derive(Serialize)]
struct Chunk<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<u64>,
    d: &'a [Fragment],
}

/// Greedy in-order packer for data log chunks.
#[derive(Debug, Clone, Default)]
pub struct LogChunker {
    watermark: Option<usize>,
}

impl LogChunker {
    /// Create a chunker at the start of a cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle: the next chunk begins with the first series.
    pub fn reset(&mut self) {
        self.watermark = None;
    }

    /// Index of the last series included in a chunk this cycle.
    pub fn watermark(&self) -> Option<usize> {
        self.watermark
    }

    /// Assemble the next chunk.
    ///
    /// With `global_offset`, the chunk carries one `to` offset (now minus the
    /// anchor entry's data time); otherwise every entry carries its own.
    /// Returns `Ok(None)` once no series with pending readings remains.
    ///
    /// The first pending entry always opens the chunk; the budget
    /// `max_bytes - DATA_LOG_RESERVED_MARGIN` only limits the entries after it.
    ///
    /// # Errors
    /// - `PayloadError::PayloadTooLarge` if the serialized chunk exceeds
    ///   `max_bytes`. This only happens when the first entry alone does not
    ///   fit; the watermark is already past it, so the next call continues
    ///   behind it.
    /// - `PayloadError::Json` if serialization fails.
    pub fn assemble(
        &mut self,
        buffer: &DataBuffer,
        id: &str,
        now_ms: u64,
        global_offset: bool,
        max_bytes: usize,
    ) -> Result<Option<String>, PayloadError> {
        let entry_time = if global_offset { None } else { Some(now_ms) };
        let series = buffer.series();
        let start = self.watermark.map_or(0, |w| w + 1);

        // Anchor: first series at or after the watermark with something to report.
        let anchor = series
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(idx, s)| s.log_fragment(entry_time).map(|f| (idx, f)));
        let Some((anchor_idx, anchor_fragment)) = anchor else {
            self.watermark = series.len().checked_sub(1);
            return Ok(None);
        };

        let cutoff = max_bytes.saturating_sub(DATA_LOG_RESERVED_MARGIN);
        self.watermark = Some(anchor_idx);

        let to = if global_offset {
            series[anchor_idx]
                .data_time()
                .map(|t| now_ms.saturating_sub(t))
        } else {
            None
        };

        let mut entries = vec![anchor_fragment];
        let mut total = joined_len(&entries);
        for (idx, s) in series.iter().enumerate().skip(anchor_idx + 1) {
            let Some(fragment) = s.log_fragment(entry_time) else {
                continue;
            };
            let len = fragment.get().len();
            if total + 1 + len >= cutoff {
                break;
            }
            total += 1 + len;
            entries.push(fragment);
            self.watermark = Some(idx);
        }

        let text = serde_json::to_string(&Chunk {
            id,
            to,
            d: &entries,
        })?;
        if text.len() > max_bytes {
            return Err(PayloadError::PayloadTooLarge {
                what: "data log",
                size: text.len(),
                limit: max_bytes,
            });
        }

        debug!(
            "Data log chunk with {} entries until index {:?} ({} bytes)",
            entries.len(),
            self.watermark,
            text.len()
        );
        Ok(Some(text))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
