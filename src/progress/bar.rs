//! Drawing the bar itself
//!
//! [`ProgressView`](super::ProgressView) decides what to show and when; a
//! [`BarDisplay`] only puts it on screen.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{DrawTarget, ProgressConfig};

/// Bar positions per percent; one decimal of resolution
const TICKS_PER_PERCENT: f64 = 10.0;

/// Something that can show a percent and a label
pub trait BarDisplay: Send {
    /// Show `percent` (already within [0, 100]) with `label`
    fn draw(&mut self, percent: f64, label: &str);

    /// Take the bar down; `keep` leaves the last frame on screen
    fn finish(&mut self, keep: bool);
}

/// `indicatif` bar on stderr
pub struct IndicatifBar {
    bar: ProgressBar,
}

impl IndicatifBar {
    pub fn new(config: &ProgressConfig) -> Self {
        let target = match config.target {
            DrawTarget::Stderr => ProgressDrawTarget::stderr(),
            DrawTarget::Hidden => ProgressDrawTarget::hidden(),
        };
        let bar = ProgressBar::with_draw_target(Some((100.0 * TICKS_PER_PERCENT) as u64), target);
        bar.set_style(bar_style(config.width));
        bar.tick();
        Self { bar }
    }
}

impl BarDisplay for IndicatifBar {
    fn draw(&mut self, percent: f64, label: &str) {
        self.bar.set_position((percent * TICKS_PER_PERCENT).round() as u64);
        self.bar.set_message(label.to_string());
    }

    fn finish(&mut self, keep: bool) {
        if keep {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }
}

fn bar_style(width: usize) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!("[{{bar:{}.cyan/blue}}] {{msg}}", width))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_positions() {
        let config = ProgressConfig {
            target: DrawTarget::Hidden,
            ..ProgressConfig::default()
        };
        let mut bar = IndicatifBar::new(&config);
        bar.draw(25.0, "quarter");
        assert_eq!(bar.bar.position(), 250);
        bar.draw(99.9, "almost");
        assert_eq!(bar.bar.position(), 999);
        bar.finish(true);
        assert!(bar.bar.is_finished());
    }
}
