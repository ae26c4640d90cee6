//! Slide navigation state machine.
//!
//! Pure bookkeeping: which slide is current, how far each slide's list has
//! been revealed, and the presenter timer. Nothing here touches the terminal;
//! the presenter view reacts to the [`Transition`]s returned.

pub mod jump;
pub mod reveal;
pub mod timer;

use std::time::Duration;

use crate::deck::{Deck, ItemKind};

pub use jump::JumpError;
pub use reveal::RevealState;
pub use timer::SlideTimer;

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current slide was (re)entered.
    Moved {
        /// Slide left.
        from: usize,
        /// Slide entered.
        to: usize,
    },
    /// Guard failed; nothing changed.
    Unchanged,
}

impl Transition {
    /// Whether the request entered a slide.
    pub const fn moved(self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of submitting the jump field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Valid slide number.
    Jumped(Transition),
    /// Field was empty.
    Empty,
    /// Invalid input; state unchanged.
    Rejected(JumpError),
}

/// Result of the reveal-then-advance input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A list item was revealed on the current slide.
    Revealed,
    /// Nothing left to reveal, so the navigator tried the next slide.
    Navigated(Transition),
}

/// Process-wide navigation state, constructed from a deck.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: usize,
    reveals: Vec<RevealState>,
    timed_slide: Option<usize>,
    timer: SlideTimer,
}

impl Navigator {
    /// Build from per-slide item kinds. `start` is clamped into range.
    pub fn new(slides: Vec<Vec<ItemKind>>, start: usize, timed_slide: Option<usize>) -> Self {
        let reveals: Vec<RevealState> = slides.into_iter().map(RevealState::new).collect();
        let current = start.min(reveals.len().saturating_sub(1));
        let mut nav = Self {
            current,
            reveals,
            timed_slide,
            timer: SlideTimer::new(),
        };
        nav.sync_timer();
        nav
    }

    /// Build from a validated deck.
    pub fn from_deck(deck: &Deck) -> Self {
        Self::new(
            deck.slides.iter().map(crate::deck::Slide::item_kinds).collect(),
            deck.start_index(),
            deck.timed_index(),
        )
    }

    /// 0-based current slide.
    pub const fn current_slide(&self) -> usize {
        self.current
    }

    /// Number of slides.
    pub fn total_slides(&self) -> usize {
        self.reveals.len()
    }

    /// Reveal state of a slide.
    pub fn reveal(&self, slide: usize) -> Option<&RevealState> {
        self.reveals.get(slide)
    }

    /// Reveal state of the current slide.
    pub fn active_reveal(&self) -> Option<&RevealState> {
        self.reveals.get(self.current)
    }

    /// The presenter timer.
    pub const fn timer(&self) -> &SlideTimer {
        &self.timer
    }

    /// 0-based timed slide, if any.
    pub const fn timed_slide(&self) -> Option<usize> {
        self.timed_slide
    }

    /// Whether `prev_slide` would move.
    pub const fn can_go_prev(&self) -> bool {
        self.current > 0
    }

    /// Whether `next_slide` would move.
    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.total_slides()
    }

    /// Move forward one slide.
    pub fn next_slide(&mut self) -> Transition {
        if !self.can_go_next() {
            return Transition::Unchanged;
        }
        self.enter(self.current + 1)
    }

    /// Move back one slide.
    pub fn prev_slide(&mut self) -> Transition {
        if !self.can_go_prev() {
            return Transition::Unchanged;
        }
        self.enter(self.current - 1)
    }

    /// Enter a 0-based slide.
    pub fn go_to(&mut self, slide: usize) -> Transition {
        if slide >= self.total_slides() {
            return Transition::Unchanged;
        }
        self.enter(slide)
    }

    /// Home key.
    pub fn first_slide(&mut self) -> Transition {
        self.go_to(0)
    }

    /// End key.
    pub fn last_slide(&mut self) -> Transition {
        self.go_to(self.total_slides().saturating_sub(1))
    }

    /// Jump to a 1-indexed slide number typed by the presenter.
    pub fn jump_to_slide(&mut self, input: &str) -> JumpOutcome {
        match jump::parse_jump_target(input, self.total_slides()) {
            Ok(Some(target)) => JumpOutcome::Jumped(self.enter(target)),
            Ok(None) => JumpOutcome::Empty,
            Err(e) => {
                tracing::debug!("Rejected jump input: {e}");
                JumpOutcome::Rejected(e)
            }
        }
    }

    /// Reveal the next list item on the current slide.
    pub fn reveal_next_item(&mut self) -> bool {
        self.reveals.get_mut(self.current).is_some_and(RevealState::reveal_next)
    }

    /// Reveal first; advance only when there is nothing left to reveal.
    pub fn on_advance(&mut self) -> Advance {
        if self.reveal_next_item() {
            Advance::Revealed
        } else {
            Advance::Navigated(self.next_slide())
        }
    }

    /// Feed wall time to the timer; returns true if its display changed.
    pub fn advance_timer(&mut self, delta: Duration) -> bool {
        self.timer.advance(delta)
    }

    fn enter(&mut self, to: usize) -> Transition {
        let from = self.current;
        self.current = to;
        for reveal in &mut self.reveals {
            reveal.reset();
        }
        self.sync_timer();
        tracing::info!("Slide {} -> {}", from + 1, to + 1);
        Transition::Moved { from, to }
    }

    fn sync_timer(&mut self) {
        if self.timed_slide == Some(self.current) {
            self.timer.start();
        } else {
            self.timer.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ItemKind::Regular as R;

    fn five_slides() -> Navigator {
        Navigator::new(vec![Vec::new(); 5], 0, None)
    }

    #[test]
    fn prev_at_start_is_noop() {
        let mut nav = five_slides();
        assert_eq!(nav.prev_slide(), Transition::Unchanged);
        assert_eq!(nav.current_slide(), 0);
    }

    #[test]
    fn next_stops_at_last_slide() {
        let mut nav = five_slides();
        for _ in 0..4 {
            assert!(nav.next_slide().moved());
        }
        assert_eq!(nav.current_slide(), 4);
        assert_eq!(nav.next_slide(), Transition::Unchanged);
        assert_eq!(nav.current_slide(), 4);
    }

    #[test]
    fn jump_out_of_range_keeps_state() {
        let mut nav = five_slides();
        nav.next_slide();
        assert!(matches!(nav.jump_to_slide("7"), JumpOutcome::Rejected(JumpError::OutOfRange { .. })));
        assert!(matches!(nav.jump_to_slide("x"), JumpOutcome::Rejected(JumpError::NotANumber(_))));
        assert_eq!(nav.jump_to_slide(""), JumpOutcome::Empty);
        assert_eq!(nav.current_slide(), 1);
        assert_eq!(nav.jump_to_slide("5"), JumpOutcome::Jumped(Transition::Moved { from: 1, to: 4 }));
    }

    #[test]
    fn start_is_clamped() {
        let nav = Navigator::new(vec![Vec::new(); 3], 10, None);
        assert_eq!(nav.current_slide(), 2);
    }

    #[test]
    fn advance_reveals_before_moving() {
        let mut nav = Navigator::new(vec![vec![R, R, R], vec![R]], 0, None);
        assert_eq!(nav.on_advance(), Advance::Revealed);
        assert_eq!(nav.on_advance(), Advance::Revealed);
        assert_eq!(nav.on_advance(), Advance::Navigated(Transition::Moved { from: 0, to: 1 }));
        assert_eq!(nav.on_advance(), Advance::Navigated(Transition::Unchanged));
    }

    #[test]
    fn transitions_reset_reveal_progress() {
        let mut nav = Navigator::new(vec![vec![R, R, R], vec![R, R]], 0, None);
        nav.reveal_next_item();
        nav.reveal_next_item();
        nav.next_slide();
        nav.reveal_next_item();
        nav.prev_slide();
        assert_eq!(nav.reveal(0).map(RevealState::current), Some(1));
        assert_eq!(nav.reveal(1).map(RevealState::current), Some(1));
    }

    #[test]
    fn home_and_end() {
        let mut nav = five_slides();
        assert_eq!(nav.last_slide(), Transition::Moved { from: 0, to: 4 });
        assert_eq!(nav.first_slide(), Transition::Moved { from: 4, to: 0 });
    }

    #[test]
    fn timer_runs_only_on_timed_slide() {
        let mut nav = Navigator::new(vec![Vec::new(); 3], 0, Some(1));
        assert!(!nav.timer().is_running());

        nav.next_slide();
        assert!(nav.timer().is_running());
        nav.advance_timer(Duration::from_secs(3));
        assert_eq!(nav.timer().elapsed_secs(), 3);

        // re-entering the timed slide resumes
        nav.jump_to_slide("2");
        assert_eq!(nav.timer().elapsed_secs(), 3);

        nav.next_slide();
        assert!(!nav.timer().is_running());
        assert_eq!(nav.timer().elapsed_secs(), 0);
    }

    #[test]
    fn starting_on_timed_slide_starts_timer() {
        let nav = Navigator::new(vec![Vec::new(); 2], 1, Some(1));
        assert!(nav.timer().is_running());
    }
}
