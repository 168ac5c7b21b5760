//! Smoothed transfer-rate estimation
//!
//! Each interval between samples yields an instantaneous rate that is
//! blended into an exponentially decaying average. The blend weight grows
//! with the interval length (`1 - e^(-dt/window)`), so bursty chunk arrival
//! does not make the displayed speed jump around, while a long pause still
//! moves the figure decisively.

use std::time::{Duration, Instant};

/// Default smoothing window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

/// Exponentially smoothed bytes-per-second estimator
#[derive(Debug, Clone)]
pub struct RateEstimator {
    /// Time constant of the decay
    window: Duration,
    /// Smoothed rate; `None` until the first interval with elapsed time
    rate: Option<f64>,
    /// End of the last measured interval
    last: Instant,
    /// Bytes seen since `last` that have not been measured yet
    pending: u64,
}

impl RateEstimator {
    /// Start estimating from `start` with the default window
    pub fn new(start: Instant) -> Self {
        Self::with_window(start, DEFAULT_WINDOW)
    }

    /// Start estimating from `start` with a custom smoothing window
    pub fn with_window(start: Instant, window: Duration) -> Self {
        let window = if window.is_zero() { DEFAULT_WINDOW } else { window };
        Self {
            window,
            rate: None,
            last: start,
            pending: 0,
        }
    }

    /// Record `bytes` arriving at `now`
    ///
    /// Zero-byte samples are ignored. Samples with no elapsed time since the
    /// previous interval (same or earlier timestamp) leave the rate untouched;
    /// their bytes are counted in the next interval that has elapsed time.
    pub fn sample(&mut self, bytes: u64, now: Instant) {
        if bytes == 0 {
            return;
        }
        self.pending = self.pending.saturating_add(bytes);

        let dt = now.saturating_duration_since(self.last).as_secs_f64();
        if dt <= 0.0 {
            return;
        }

        let instant = self.pending as f64 / dt;
        self.last = now;
        self.pending = 0;
        if !instant.is_finite() {
            return;
        }

        let next = match self.rate {
            None => instant,
            Some(prev) => {
                let alpha = 1.0 - (-dt / self.window.as_secs_f64()).exp();
                prev + alpha * (instant - prev)
            }
        };

        if next.is_finite() && next >= 0.0 {
            self.rate = Some(next);
        }
    }

    /// Current smoothed rate in bytes per second (0 before any measurement)
    pub fn current_rate(&self) -> f64 {
        self.rate.unwrap_or(0.0)
    }
}
