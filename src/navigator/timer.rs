//! Presenter timer for the designated timed slide.

use std::time::Duration;

use crate::constants::timing::TIMER_TICK_MS;

/// A one-second resolution start/stop/reset counter.
///
/// The counter does not read the clock itself. The app accumulates wall time
/// with [`SlideTimer::advance`], which turns whole seconds into ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideTimer {
    elapsed_secs: u64,
    running: bool,
    pending: Duration,
}

impl SlideTimer {
    /// A stopped timer at zero.
    pub const fn new() -> Self {
        Self {
            elapsed_secs: 0,
            running: false,
            pending: Duration::ZERO,
        }
    }

    /// Start, or resume if already started.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.pending = Duration::ZERO;
        }
    }

    /// Stop without clearing the count.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    /// Stop and return to zero.
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed_secs = 0;
    }

    /// Count one second if running.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs += 1;
        }
    }

    /// Feed elapsed wall time; returns true if the display changed.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }
        let tick = Duration::from_millis(TIMER_TICK_MS);
        self.pending += delta;
        let before = self.elapsed_secs;
        while self.pending >= tick {
            self.pending -= tick;
            self.tick();
        }
        self.elapsed_secs != before
    }

    /// Whole seconds counted.
    pub const fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Whether the timer is counting.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// `MM:SS`, minutes growing past 99 if needed.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_ignores_ticks() {
        let mut timer = SlideTimer::new();
        timer.tick();
        assert!(!timer.advance(Duration::from_secs(5)));
        assert_eq!(timer.elapsed_secs(), 0);
    }

    #[test]
    fn advance_counts_whole_seconds() {
        let mut timer = SlideTimer::new();
        timer.start();
        assert!(!timer.advance(Duration::from_millis(600)));
        assert!(timer.advance(Duration::from_millis(600)));
        assert_eq!(timer.elapsed_secs(), 1);
        assert!(timer.advance(Duration::from_millis(2_000)));
        assert_eq!(timer.elapsed_secs(), 3);
    }

    #[test]
    fn start_resumes_and_reset_clears() {
        let mut timer = SlideTimer::new();
        timer.start();
        timer.tick();
        timer.start();
        timer.tick();
        assert_eq!(timer.elapsed_secs(), 2);
        timer.reset();
        assert_eq!(timer.elapsed_secs(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn display_format() {
        let mut timer = SlideTimer::new();
        timer.start();
        for _ in 0..125 {
            timer.tick();
        }
        assert_eq!(timer.display(), "02:05");
    }
}
