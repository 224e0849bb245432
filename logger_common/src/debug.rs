//! Debug output categories.
//!
//! Each flag enables extra `debug!` output for one area of the controller.
//! `WEBHOOKS` also changes behavior: logs are exposed as readable values
//! instead of being published.

use bitflags::bitflags;

bitflags! {
    /// Debug categories enabled for a controller instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u8 {
        /// State changes (locking, logging switches, period).
        const STATE    = 0x01;
        /// Data clearing and log triggers.
        const DATA     = 0x02;
        /// Readable values and publish results.
        const CLOUD    = 0x04;
        /// Logs go to readable values, nothing is published.
        const WEBHOOKS = 0x08;
    }
}

impl DebugFlags {
    /// Returns true if logs must be mirrored to readable values instead of published.
    #[inline]
    pub const fn webhooks_debug(&self) -> bool {
        self.contains(Self::WEBHOOKS)
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(DebugFlags::default().is_empty());
        assert!(!DebugFlags::default().webhooks_debug());
    }

    #[test]
    fn webhooks_flag() {
        let flags = DebugFlags::STATE | DebugFlags::WEBHOOKS;
        assert!(flags.webhooks_debug());
        assert!(!DebugFlags::CLOUD.webhooks_debug());
    }
}
