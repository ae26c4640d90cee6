//! Deferred view effects.

use std::time::{Duration, Instant};

/// A view change that fires after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Make a paragraph container visible.
    ShowParagraph {
        /// Slide owning the container.
        slide: usize,
        /// Container index on that slide.
        index: usize,
    },
    /// Start or stop the profile card animation on a slide.
    AnimateProfiles {
        /// Slide owning the cards.
        slide: usize,
        /// Animation on or off.
        active: bool,
    },
    /// Restore the jump field's normal border.
    ClearJumpError,
}

#[derive(Debug, Clone)]
struct Pending {
    due: Instant,
    seq: u64,
    effect: Effect,
}

/// Queue of effects ordered by deadline, then by insertion.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Timeline {
    /// An empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Queue an effect `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, effect: Effect) {
        self.pending.push(Pending {
            due: now + delay,
            seq: self.next_seq,
            effect,
        });
        self.next_seq += 1;
    }

    /// Drop pending effects matching a predicate.
    pub fn cancel(&mut self, mut predicate: impl FnMut(&Effect) -> bool) {
        self.pending.retain(|p| !predicate(&p.effect));
    }

    /// Remove and return every effect due at `now`, in firing order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Effect> {
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.effect).collect()
    }

    /// Number of effects waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_deadline_order() {
        let now = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule(now, Duration::from_millis(300), Effect::ClearJumpError);
        timeline.schedule(now, Duration::from_millis(100), Effect::ShowParagraph { slide: 0, index: 0 });
        timeline.schedule(now, Duration::from_millis(900), Effect::ShowParagraph { slide: 0, index: 1 });

        assert!(timeline.drain_due(now).is_empty());
        let fired = timeline.drain_due(now + Duration::from_millis(500));
        assert_eq!(
            fired,
            vec![Effect::ShowParagraph { slide: 0, index: 0 }, Effect::ClearJumpError]
        );
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let now = Instant::now();
        let mut timeline = Timeline::new();
        let delay = Duration::from_millis(10);
        timeline.schedule(now, delay, Effect::AnimateProfiles { slide: 1, active: false });
        timeline.schedule(now, delay, Effect::AnimateProfiles { slide: 2, active: true });
        let fired = timeline.drain_due(now + delay);
        assert_eq!(fired[0], Effect::AnimateProfiles { slide: 1, active: false });
        assert_eq!(fired[1], Effect::AnimateProfiles { slide: 2, active: true });
    }

    #[test]
    fn cancel_removes_matching() {
        let now = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule(now, Duration::ZERO, Effect::ShowParagraph { slide: 0, index: 0 });
        timeline.schedule(now, Duration::ZERO, Effect::ClearJumpError);
        timeline.cancel(|e| matches!(e, Effect::ShowParagraph { .. }));
        assert_eq!(timeline.drain_due(now), vec![Effect::ClearJumpError]);
        assert!(timeline.is_empty());
    }
}
