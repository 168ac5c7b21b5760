//! Terminal progress bar for a running transfer
//!
//! A [`ProgressView`] goes Uninitialized → Active → Terminated. Starting it
//! takes over the terminal (raw mode, hidden cursor); stopping it gives the
//! terminal back. `stop` may be reached from several places (normal end,
//! stream error, interrupt, `Drop`) and only the first call does anything.

pub mod bar;
pub mod terminal;

use tracing::{debug, warn};

pub use bar::{BarDisplay, IndicatifBar};
pub use terminal::{force_restore, CrosstermTerminal, TerminalMode};

/// Where the bar is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawTarget {
    #[default]
    Stderr,
    /// Nothing is drawn (tests, non-interactive runs)
    Hidden,
}

/// Bar appearance
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Bar width in columns
    pub width: usize,
    pub target: DrawTarget,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            width: 40,
            target: DrawTarget::Stderr,
        }
    }
}

/// What the bar currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBarState {
    /// Always within [0, 100]
    pub percent: f64,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active,
    Terminated,
}

/// The progress bar widget and the terminal it holds
pub struct ProgressView {
    phase: Phase,
    bar: Box<dyn BarDisplay>,
    terminal: Box<dyn TerminalMode>,
    state: ProgressBarState,
    /// Final 100% render happened; keep the bar on screen when stopping
    completed: bool,
}

impl ProgressView {
    /// Take over the terminal and show an empty `indicatif` bar
    pub fn start(config: ProgressConfig, terminal: Box<dyn TerminalMode>) -> std::io::Result<Self> {
        Self::start_with(Box::new(IndicatifBar::new(&config)), terminal)
    }

    /// Take over the terminal and draw through `bar`
    pub fn start_with(bar: Box<dyn BarDisplay>, terminal: Box<dyn TerminalMode>) -> std::io::Result<Self> {
        let mut view = Self {
            phase: Phase::Uninitialized,
            bar,
            terminal,
            state: ProgressBarState {
                percent: 0.0,
                label: String::new(),
                visible: false,
            },
            completed: false,
        };

        if let Err(e) = view.terminal.enter() {
            // May have got halfway (raw mode on, cursor still visible)
            let _ = view.terminal.restore();
            view.bar.finish(false);
            view.phase = Phase::Terminated;
            return Err(e);
        }

        view.phase = Phase::Active;
        view.state.visible = true;
        debug!("Progress bar started");
        Ok(view)
    }

    /// Update percent and label and redraw; ignored unless Active
    pub fn render(&mut self, percent: f64, label: &str) {
        if self.phase != Phase::Active {
            return;
        }
        let percent = clamp_percent(percent);
        self.state.percent = percent;
        self.state.label.clear();
        self.state.label.push_str(label);
        self.bar.draw(percent, label);
    }

    /// Force the bar to exactly 100% with a closing summary
    pub fn finish(&mut self, summary: &str) {
        if self.phase != Phase::Active {
            return;
        }
        self.render(100.0, summary);
        self.completed = true;
    }

    /// Give the terminal back and take the bar down
    ///
    /// Only the first call has an effect; later calls return `Ok(())`.
    pub fn stop(&mut self) -> std::io::Result<()> {
        if self.phase != Phase::Active {
            return Ok(());
        }
        self.phase = Phase::Terminated;

        let restored = self.terminal.restore();
        self.bar.finish(self.completed);
        self.state.visible = false;

        if let Err(ref e) = restored {
            warn!(error = %e, "Failed to restore terminal mode");
        } else {
            debug!("Progress bar stopped, terminal restored");
        }
        restored
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ProgressBarState {
        &self.state
    }
}

impl Drop for ProgressView {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Keep a percent inside [0, 100]; NaN becomes 0
fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Percent complete for display
///
/// `100 * received / expected`, or 0 when the length is unknown. A result
/// that is negative, above 100 or not a number is shown as 0, and the value
/// is truncated to one decimal place.
pub fn compute_percent(received: u64, expected: Option<u64>) -> f64 {
    let Some(expected) = expected else {
        return 0.0;
    };
    if expected == 0 || received > expected {
        return 0.0;
    }
    // Integer per-mille so the truncation is exact
    let per_mille = u128::from(received) * 1000 / u128::from(expected);
    per_mille as f64 / 10.0
}
