//! Hover and click wiring, expressed as data.

use std::collections::HashSet;

use rand::Rng;

use super::scene::{Color, Fill, Scene};
use super::shape::Shape;
use crate::types::{DiagramId, ElementId};

/// Pointer event an interaction listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Pointer enters the element.
    Hover,
    /// Pointer is pressed and released on the element.
    Click,
}

/// What happens when the trigger fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Emphasize other elements while the trigger is hovered.
    Highlight(Vec<ElementId>),
    /// Show or hide a group inside the same scene.
    ToggleGroup(ElementId),
    /// Show or hide another diagram's container on the board.
    ToggleDiagram(DiagramId),
    /// Step the trigger's fill through a colour list.
    CycleFill(Vec<Color>),
    /// Give a bar a random height above a fixed baseline.
    RandomizeHeight {
        /// Bottom edge of the bar.
        baseline: f64,
        /// Smallest height.
        min: f64,
        /// Added to `min` times a uniform sample.
        span: f64,
    },
}

/// One row of a scene's interaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Element the pointer acts on.
    pub trigger: ElementId,
    /// Event listened for.
    pub on: Trigger,
    /// Effect.
    pub action: Action,
}

impl Interaction {
    /// Hover interaction.
    pub fn hover(trigger: impl Into<ElementId>, action: Action) -> Self {
        Self { trigger: trigger.into(), on: Trigger::Hover, action }
    }

    /// Click interaction.
    pub fn click(trigger: impl Into<ElementId>, action: Action) -> Self {
        Self { trigger: trigger.into(), on: Trigger::Click, action }
    }
}

/// Effect of a click that reaches outside the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardRequest {
    /// Flip another diagram's visibility.
    ToggleDiagram(DiagramId),
}

/// Per-scene pointer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    hovered: Option<ElementId>,
    highlighted: HashSet<ElementId>,
    focus: Option<usize>,
}

impl InteractionState {
    /// Element under the pointer (or focused from the keyboard).
    pub const fn hovered(&self) -> Option<&ElementId> {
        self.hovered.as_ref()
    }

    /// Whether an element should be drawn emphasized.
    pub fn is_highlighted(&self, id: &ElementId) -> bool {
        self.highlighted.contains(id)
    }

    /// Set of emphasized ids.
    pub const fn highlighted(&self) -> &HashSet<ElementId> {
        &self.highlighted
    }

    /// Move the hover to `target`. Returns true if anything changed.
    pub fn hover(&mut self, scene: &Scene, target: Option<ElementId>) -> bool {
        if self.hovered == target {
            return false;
        }
        self.highlighted.clear();
        if let Some(id) = &target {
            if scene.element(id).is_some_and(|e| e.hover.is_some()) {
                self.highlighted.insert(id.clone());
            }
            for interaction in scene.interactions.iter().filter(|i| &i.trigger == id && i.on == Trigger::Hover) {
                if let Action::Highlight(ids) = &interaction.action {
                    self.highlighted.extend(ids.iter().cloned());
                }
            }
        }
        self.hovered = target;
        true
    }

    /// Run every click interaction on `target`.
    pub fn click<R: Rng>(&mut self, scene: &mut Scene, target: &ElementId, rng: &mut R) -> Vec<BoardRequest> {
        let actions: Vec<Action> = scene
            .interactions
            .iter()
            .filter(|i| &i.trigger == target && i.on == Trigger::Click)
            .map(|i| i.action.clone())
            .collect();

        let mut requests = Vec::new();
        for action in actions {
            match action {
                Action::ToggleGroup(group) => {
                    if let Some(hidden) = scene.toggle_group(&group) {
                        tracing::debug!("Group {group} hidden={hidden}");
                    }
                }
                Action::ToggleDiagram(diagram) => requests.push(BoardRequest::ToggleDiagram(diagram)),
                Action::CycleFill(colors) => {
                    if let Some(element) = scene.element_mut(target) {
                        let current = element.paint.fill.color();
                        let next = current
                            .and_then(|c| colors.iter().position(|x| *x == c))
                            .map_or(0, |i| (i + 1) % colors.len().max(1));
                        if let Some(color) = colors.get(next) {
                            element.paint.fill = Fill::Solid(*color);
                        }
                    }
                }
                Action::RandomizeHeight { baseline, min, span } => {
                    if let Some(element) = scene.element_mut(target) {
                        if let Shape::Rect(rect) = &mut element.shape {
                            let height = rng.gen::<f64>().mul_add(span, min);
                            rect.height = height;
                            rect.y = baseline - height;
                        }
                    }
                }
                Action::Highlight(_) => {}
            }
        }
        // the clicked scene may have hidden or revealed highlight targets
        let hovered = self.hovered.take();
        self.hover(scene, hovered);
        requests
    }

    /// Move the keyboard focus through the scene's interactive elements and
    /// hover the focused one. Returns the newly focused id, or `None` once
    /// the focus steps past the last (or first) element; the next step then
    /// starts over from the other end.
    pub fn focus_step(&mut self, scene: &Scene, forward: bool) -> Option<ElementId> {
        let ids = scene.interactive_ids();
        let len = ids.len();
        let next = match (self.focus, forward) {
            _ if len == 0 => None,
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) => Some(i + 1).filter(|&n| n < len),
            (Some(i), false) => i.checked_sub(1),
        };
        let Some(next) = next else {
            self.clear();
            return None;
        };
        self.focus = Some(next);
        let id = ids.get(next).cloned();
        self.hover(scene, id.clone());
        id
    }

    /// Drop hover, highlight, and focus.
    pub fn clear(&mut self) {
        self.hovered = None;
        self.highlighted.clear();
        self.focus = None;
    }
}
