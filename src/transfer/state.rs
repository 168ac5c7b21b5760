//! Running byte counts for one transfer and the labels derived from them

use crate::binary::{format_bytes, format_rate};
use crate::progress::compute_percent;

/// Bytes received so far and the declared total, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferProgress {
    received: u64,
    expected: Option<u64>,
}

impl TransferProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declared length; only the first call takes effect
    pub fn set_expected(&mut self, bytes: u64) -> bool {
        if self.expected.is_some() {
            return false;
        }
        self.expected = Some(bytes);
        true
    }

    /// Count another chunk
    pub fn add(&mut self, bytes: u64) {
        self.received = self.received.saturating_add(bytes);
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn expected(&self) -> Option<u64> {
        self.expected
    }

    /// Display percent, see [`compute_percent`]
    pub fn percent(&self) -> f64 {
        compute_percent(self.received, self.expected)
    }

    /// Label shown while data is flowing, e.g. `25.0% 250 B / 1000 B (1.2 KiB/s)`
    ///
    /// Without a declared length the percent stays at `0.0%` and no total is shown.
    pub fn live_label(&self, rate: f64) -> String {
        match self.expected {
            Some(expected) => format!(
                "{:.1}% {} / {} ({})",
                self.percent(),
                format_bytes(self.received, 2),
                format_bytes(expected, 2),
                format_rate(rate)
            ),
            None => format!(
                "{:.1}% {} ({})",
                self.percent(),
                format_bytes(self.received, 2),
                format_rate(rate)
            ),
        }
    }

    /// Label shown once the body is complete
    pub fn summary_label(&self) -> String {
        format!("{} transferred", format_bytes(self.received, 2))
    }
}
