//! Byte count formatting
//!
//! Human-readable sizes and rates for the progress label.

use humansize::{format_size, FormatSizeOptions, BINARY};

/// Format byte count as human-readable size
///
/// Uses binary units (KiB, MiB, GiB, etc.)
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    let options = FormatSizeOptions::from(BINARY)
        .decimal_places(precision)
        .decimal_zeroes(precision);
    format_size(bytes, options)
}

/// Format a throughput in bytes per second, e.g. `1.50 KiB/s`
pub fn format_rate(bytes_per_sec: f64) -> String {
    let rate = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec.round() as u64
    } else {
        0
    };
    format!("{}/s", format_bytes(rate, 2))
}
