//! Presenter view model.
//!
//! Holds everything the screen shows that is not navigation state: the
//! viewport offset, button states, jump field, and the paragraph/profile
//! entrance animations. [`PresenterView::update_slide`] is run after every
//! transition.

pub mod timeline;

use std::time::{Duration, Instant};

use crate::constants::timing::{
    JUMP_ERROR_FLASH_MS, PARAGRAPH_STAGGER_MS, PARAGRAPH_START_DELAY_MS, PROFILE_ANIMATE_IN_MS,
    PROFILE_ANIMATE_OUT_MS,
};
use crate::deck::Deck;
use crate::navigator::Navigator;

pub use timeline::{Effect, Timeline};

/// Screen-side state derived from navigation.
#[derive(Debug, Clone)]
pub struct PresenterView {
    viewport_width: u16,
    viewport_offset: u32,
    slide: usize,
    total: usize,
    prev_enabled: bool,
    next_enabled: bool,
    /// Contents of the jump-to-slide field.
    pub jump_input: String,
    jump_error: bool,
    paragraphs: Vec<Vec<bool>>,
    profiles_animated: Vec<bool>,
    animated_slides: Vec<bool>,
    previous_slide: Option<usize>,
    timeline: Timeline,
}

impl PresenterView {
    /// Fresh view for a deck. Call [`Self::update_slide`] once to show the
    /// start slide.
    pub fn new(deck: &Deck) -> Self {
        Self {
            viewport_width: 0,
            viewport_offset: 0,
            slide: 0,
            total: deck.len(),
            prev_enabled: false,
            next_enabled: deck.len() > 1,
            jump_input: String::new(),
            jump_error: false,
            paragraphs: deck.slides.iter().map(|s| vec![false; s.paragraphs.len()]).collect(),
            profiles_animated: vec![false; deck.len()],
            animated_slides: deck.slides.iter().map(|s| s.animate_profiles).collect(),
            previous_slide: None,
            timeline: Timeline::new(),
        }
    }

    /// Re-render after a transition.
    pub fn update_slide(&mut self, nav: &Navigator, now: Instant) {
        let current = nav.current_slide();
        self.slide = current;
        self.total = nav.total_slides();
        self.viewport_offset = u32::try_from(current).unwrap_or(u32::MAX) * u32::from(self.viewport_width);
        self.prev_enabled = nav.can_go_prev();
        self.next_enabled = nav.can_go_next();
        self.jump_input.clear();

        if let Some(prev) = self.previous_slide {
            if self.animated_slides.get(prev).copied().unwrap_or(false) {
                self.timeline.schedule(
                    now,
                    Duration::from_millis(PROFILE_ANIMATE_OUT_MS),
                    Effect::AnimateProfiles { slide: prev, active: false },
                );
            }
        }
        self.previous_slide = Some(current);

        if self.animated_slides.get(current).copied().unwrap_or(false) {
            self.timeline.schedule(
                now,
                Duration::from_millis(PROFILE_ANIMATE_IN_MS),
                Effect::AnimateProfiles { slide: current, active: true },
            );
        }

        // hide every container before queueing the new slide's entrance
        self.timeline.cancel(|e| matches!(e, Effect::ShowParagraph { .. }));
        for slide in &mut self.paragraphs {
            slide.iter_mut().for_each(|v| *v = false);
        }
        let count = self.paragraphs.get(current).map_or(0, Vec::len);
        for index in 0..count {
            let delay = PARAGRAPH_START_DELAY_MS + PARAGRAPH_STAGGER_MS * index as u64;
            self.timeline.schedule(
                now,
                Duration::from_millis(delay),
                Effect::ShowParagraph { slide: current, index },
            );
        }
    }

    /// Flash the jump field border after invalid input.
    pub fn flash_jump_error(&mut self, now: Instant) {
        self.jump_error = true;
        self.timeline.cancel(|e| matches!(e, Effect::ClearJumpError));
        self.timeline.schedule(now, Duration::from_millis(JUMP_ERROR_FLASH_MS), Effect::ClearJumpError);
    }

    /// Apply every effect due at `now`. Returns true if anything changed.
    pub fn advance_clock(&mut self, now: Instant) -> bool {
        let due = self.timeline.drain_due(now);
        let changed = !due.is_empty();
        for effect in due {
            self.apply(effect);
        }
        changed
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ShowParagraph { slide, index } => {
                if let Some(v) = self.paragraphs.get_mut(slide).and_then(|p| p.get_mut(index)) {
                    *v = true;
                }
            }
            Effect::AnimateProfiles { slide, active } => {
                if let Some(v) = self.profiles_animated.get_mut(slide) {
                    *v = active;
                }
            }
            Effect::ClearJumpError => self.jump_error = false,
        }
    }

    /// Track the terminal width used for the slide strip.
    pub fn set_viewport_width(&mut self, width: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.viewport_offset = u32::try_from(self.slide).unwrap_or(u32::MAX) * u32::from(width);
        }
    }

    /// Horizontal offset of the slide strip, in columns.
    pub const fn viewport_offset(&self) -> u32 {
        self.viewport_offset
    }

    /// Slide the viewport currently shows.
    pub fn visible_slide(&self) -> usize {
        if self.viewport_width == 0 {
            return self.slide;
        }
        (self.viewport_offset / u32::from(self.viewport_width)) as usize
    }

    /// `current / total`, 1-indexed.
    pub fn counter(&self) -> String {
        format!("{} / {}", self.slide + 1, self.total)
    }

    /// Previous button enabled.
    pub const fn prev_enabled(&self) -> bool {
        self.prev_enabled
    }

    /// Next button enabled.
    pub const fn next_enabled(&self) -> bool {
        self.next_enabled
    }

    /// Jump field showing its error border.
    pub const fn jump_error(&self) -> bool {
        self.jump_error
    }

    /// Whether a paragraph container has entered.
    pub fn paragraph_visible(&self, slide: usize, index: usize) -> bool {
        self.paragraphs.get(slide).and_then(|p| p.get(index)).copied().unwrap_or(false)
    }

    /// Whether a slide's profile cards are animating.
    pub fn profiles_animated(&self, slide: usize) -> bool {
        self.profiles_animated.get(slide).copied().unwrap_or(false)
    }

    /// Whether deferred effects are still queued.
    pub fn has_pending_effects(&self) -> bool {
        !self.timeline.is_empty()
    }
}
