//! Progressive disclosure of a slide's list items.

use crate::deck::ItemKind;

/// Reveal bookkeeping for one slide.
///
/// `current` counts revealed regular items. An explanation item directly
/// before a regular item becomes visible in the same step as that item and is
/// not counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    kinds: Vec<ItemKind>,
    regular: Vec<usize>,
    visible: Vec<bool>,
    current: usize,
    all_revealed: bool,
}

impl RevealState {
    /// Build the state for a slide and put it at its baseline.
    pub fn new(kinds: Vec<ItemKind>) -> Self {
        let regular = kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == ItemKind::Regular)
            .map(|(i, _)| i)
            .collect();
        let visible = vec![false; kinds.len()];
        let mut state = Self {
            kinds,
            regular,
            visible,
            current: 0,
            all_revealed: true,
        };
        state.reset();
        state
    }

    /// Number of regular items.
    pub fn total(&self) -> usize {
        self.regular.len()
    }

    /// Number of regular items revealed so far.
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether every regular item is visible.
    pub const fn all_revealed(&self) -> bool {
        self.all_revealed
    }

    /// Whether the item at a source-order index is visible.
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Visibility of every item in source order.
    pub fn visibility(&self) -> &[bool] {
        &self.visible
    }

    /// Return to the "first item visible" baseline.
    pub fn reset(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
        self.current = 0;
        if !self.regular.is_empty() {
            self.disclose(0);
            self.current = 1;
        }
        self.all_revealed = self.current >= self.total();
    }

    /// Reveal the next regular item (and its explanation). Returns `false`
    /// when everything is already visible.
    pub fn reveal_next(&mut self) -> bool {
        if self.all_revealed {
            return false;
        }
        self.disclose(self.current);
        self.current += 1;
        self.all_revealed = self.current >= self.total();
        true
    }

    fn disclose(&mut self, step: usize) {
        let Some(&pos) = self.regular.get(step) else {
            return;
        };
        self.visible[pos] = true;
        if pos > 0 && self.kinds[pos - 1] == ItemKind::Explanation {
            self.visible[pos - 1] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ItemKind::{Explanation as E, Regular as R};

    #[test]
    fn three_regular_items() {
        let mut state = RevealState::new(vec![R, R, R]);
        assert_eq!(state.total(), 3);
        assert_eq!(state.current(), 1);
        assert!(!state.all_revealed());
        assert_eq!(state.visibility(), &[true, false, false]);

        assert!(state.reveal_next());
        assert!(state.reveal_next());
        assert_eq!(state.current(), 3);
        assert!(state.all_revealed());
        assert!(!state.reveal_next());
        assert_eq!(state.current(), 3);
    }

    #[test]
    fn empty_slide_is_fully_revealed() {
        let mut state = RevealState::new(Vec::new());
        assert_eq!(state.total(), 0);
        assert_eq!(state.current(), 0);
        assert!(state.all_revealed());
        assert!(!state.reveal_next());
    }

    #[test]
    fn single_item_is_revealed_at_baseline() {
        let mut state = RevealState::new(vec![R]);
        assert_eq!(state.current(), 1);
        assert!(state.all_revealed());
        assert!(!state.reveal_next());
    }

    #[test]
    fn explanation_reveals_with_following_item() {
        let mut state = RevealState::new(vec![E, R, E, R, R]);
        assert_eq!(state.total(), 3);
        assert_eq!(state.visibility(), &[true, true, false, false, false]);

        assert!(state.reveal_next());
        assert_eq!(state.current(), 2);
        assert_eq!(state.visibility(), &[true, true, true, true, false]);

        assert!(state.reveal_next());
        assert_eq!(state.visibility(), &[true, true, true, true, true]);
        assert!(state.all_revealed());
    }

    #[test]
    fn trailing_explanation_stays_hidden() {
        let mut state = RevealState::new(vec![R, R, E]);
        while state.reveal_next() {}
        assert!(!state.is_visible(2));
        assert!(state.is_visible(1));
    }

    #[test]
    fn reset_restores_baseline() {
        let mut state = RevealState::new(vec![E, R, R, R]);
        state.reveal_next();
        state.reveal_next();
        state.reset();
        assert_eq!(state.current(), 1);
        assert!(!state.all_revealed());
        assert_eq!(state.visibility(), &[true, true, false, false]);
    }

    #[test]
    fn bounds_hold_for_any_sequence() {
        let layouts: [&[ItemKind]; 5] = [&[], &[E], &[R, E, R], &[E, E, R, R], &[R, R, R, R, R, R]];
        for layout in layouts {
            let mut state = RevealState::new(layout.to_vec());
            for _ in 0..10 {
                let before = state.current();
                let was_done = state.all_revealed();
                let revealed = state.reveal_next();
                assert_eq!(revealed, !was_done);
                if revealed {
                    assert_eq!(state.current(), before + 1);
                }
                assert!(state.current() <= state.total());
                assert_eq!(state.all_revealed(), state.current() >= state.total());
            }
        }
    }
}
