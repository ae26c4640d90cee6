//! Diagram renderers and the board that hosts their scenes.
//!
//! A [`Renderer`] turns (optionally loaded) data into a fresh [`Scene`]. The
//! [`DiagramBoard`] owns one slot per registered diagram: the current scene,
//! whether its container is shown, and the pointer state for it. Static
//! diagrams render when the board is built; data-driven diagrams render when
//! [`DiagramBoard::on_data`] is called with the loaded data.

pub mod cluster_glyph;
pub mod data;
pub mod drag;
pub mod flow;
pub mod hierarchy;
pub mod interaction;
pub mod playground;
pub mod process;
pub mod scale;
pub mod scene;
pub mod shape;
pub mod similarity;
pub mod svg;

use rand::rngs::StdRng;

use crate::deck::{Deck, Slide};
use crate::error::Result;
use crate::types::{DiagramId, ElementId};
use data::{DataSet, DATA_ERROR_MESSAGE};
use drag::DragSession;
use interaction::{BoardRequest, InteractionState};
use scene::Scene;
use shape::Point;

/// Ids of the diagrams that exist without any deck configuration.
pub const BUILTIN_DIAGRAMS: &[&str] = &["similarity-heatmap", "cluster-glyphs", "process-model", "playground"];

/// Something that draws one diagram.
pub trait Renderer: Send {
    /// Board id.
    fn id(&self) -> DiagramId;

    /// Whether the renderer waits for the heatmap and dendrogram files.
    fn needs_data(&self) -> bool {
        false
    }

    /// Build a fresh scene.
    fn render(&self, data: Option<&DataSet>) -> Result<Scene>;
}

/// Every renderer a deck can reference.
pub fn renderers_for(deck: &Deck) -> Vec<Box<dyn Renderer>> {
    let mut renderers: Vec<Box<dyn Renderer>> = vec![
        Box::new(similarity::SimilarityHeatmap),
        Box::new(cluster_glyph::ClusterGlyphs),
        Box::new(process::ProcessModel),
        Box::new(playground::Playground),
    ];
    renderers.extend(deck.flows.iter().cloned().map(|f| Box::new(flow::FlowRenderer::new(f)) as Box<dyn Renderer>));
    renderers
}

/// What a slot currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotContent {
    /// Waiting for data.
    Loading,
    /// Rendered and interactive.
    Ready(Scene),
    /// Inline message instead of the diagram.
    Failed(String),
}

/// One diagram container.
#[derive(Debug)]
pub struct DiagramSlot {
    /// Diagram id.
    pub id: DiagramId,
    /// Current content.
    pub content: SlotContent,
    /// Whether the container is shown.
    pub visible: bool,
    /// Hover, highlight, and focus.
    pub state: InteractionState,
    drag: Option<DragSession>,
    needs_data: bool,
}

impl DiagramSlot {
    /// Rendered scene, if any.
    pub const fn scene(&self) -> Option<&Scene> {
        match &self.content {
            SlotContent::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    /// Whether a drag is in progress.
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

/// Owner of every rendered diagram.
pub struct DiagramBoard {
    renderers: Vec<Box<dyn Renderer>>,
    slots: Vec<DiagramSlot>,
    rng: StdRng,
}

impl std::fmt::Debug for DiagramBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBoard").field("slots", &self.slots).finish_non_exhaustive()
    }
}

impl DiagramBoard {
    /// Register every diagram of `deck` and render the static ones.
    pub fn new(deck: &Deck, rng: StdRng) -> Self {
        Self::with_renderers(renderers_for(deck), rng)
    }

    /// Board over an explicit renderer list.
    pub fn with_renderers(renderers: Vec<Box<dyn Renderer>>, rng: StdRng) -> Self {
        let slots = renderers
            .iter()
            .map(|r| {
                let needs_data = r.needs_data();
                let content = if needs_data { SlotContent::Loading } else { render_slot(r.as_ref(), None) };
                DiagramSlot {
                    id: r.id(),
                    content,
                    visible: true,
                    state: InteractionState::default(),
                    drag: None,
                    needs_data,
                }
            })
            .collect();
        Self { renderers, slots, rng }
    }

    /// All slots in registration order.
    pub fn slots(&self) -> &[DiagramSlot] {
        &self.slots
    }

    /// Slot by id.
    pub fn slot(&self, id: &DiagramId) -> Option<&DiagramSlot> {
        self.slots.iter().find(|s| &s.id == id)
    }

    fn slot_mut(&mut self, id: &DiagramId) -> Option<&mut DiagramSlot> {
        self.slots.iter_mut().find(|s| &s.id == id)
    }

    /// Whether a diagram's container is shown.
    pub fn is_visible(&self, id: &DiagramId) -> bool {
        self.slot(id).is_some_and(|s| s.visible)
    }

    /// Render the data-driven diagrams, or show the load error in them.
    pub fn on_data(&mut self, data: Result<DataSet>) {
        match data {
            Ok(data) => {
                for (renderer, slot) in self.renderers.iter().zip(self.slots.iter_mut()) {
                    if slot.needs_data {
                        slot.content = render_slot(renderer.as_ref(), Some(&data));
                        slot.state.clear();
                        slot.drag = None;
                    }
                }
                tracing::info!("Rendered data-driven diagrams");
            }
            Err(e) => {
                tracing::warn!("Diagram data failed to load: {e}");
                for slot in self.slots.iter_mut().filter(|s| s.needs_data) {
                    slot.content = SlotContent::Failed(DATA_ERROR_MESSAGE.to_string());
                }
            }
        }
    }

    /// Reset the containers of a slide's diagrams to their initial visibility
    /// and drop any leftover pointer state.
    pub fn enter_slide(&mut self, slide: &Slide) {
        for reference in &slide.diagrams {
            if let Some(slot) = self.slot_mut(&reference.id) {
                slot.visible = !reference.hidden;
                slot.state.clear();
                slot.drag = None;
            }
        }
    }

    /// Pointer moved over a diagram; `None` means it left.
    /// Returns true if the highlight changed.
    pub fn hover(&mut self, id: &DiagramId, pointer: Option<Point>) -> bool {
        let Some(slot) = self.slot_mut(id) else { return false };
        if let Some(session) = slot.drag {
            if let (SlotContent::Ready(scene), Some(p)) = (&mut slot.content, pointer) {
                session.drag_to(scene, p);
                return true;
            }
        }
        let SlotContent::Ready(scene) = &slot.content else { return false };
        let target = pointer.and_then(|p| scene.hit_test_id(p));
        slot.state.hover(scene, target)
    }

    /// Pointer pressed on a diagram. Draggable elements are picked up, any
    /// other element under the pointer is clicked. Returns true if the press
    /// landed on an element.
    pub fn press(&mut self, id: &DiagramId, pointer: Point) -> bool {
        let Some(slot) = self.slot_mut(id) else { return false };
        let SlotContent::Ready(scene) = &mut slot.content else { return false };
        if let Some(session) = DragSession::begin(scene, pointer) {
            slot.drag = Some(session);
            return true;
        }
        match scene.hit_test_id(pointer) {
            Some(element) => {
                self.click(id, &element);
                true
            }
            None => false,
        }
    }

    /// Pointer moved with the button held.
    pub fn drag_to(&mut self, id: &DiagramId, pointer: Point) -> bool {
        let Some(slot) = self.slot_mut(id) else { return false };
        let (Some(session), SlotContent::Ready(scene)) = (slot.drag, &mut slot.content) else { return false };
        session.drag_to(scene, pointer);
        true
    }

    /// Pointer released; ends any drag on the diagram.
    pub fn release(&mut self, id: &DiagramId) -> bool {
        self.slot_mut(id).and_then(|slot| slot.drag.take()).is_some()
    }

    /// Click an element and apply the board-level effects it requests.
    pub fn click(&mut self, id: &DiagramId, element: &ElementId) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| &s.id == id) else { return false };
        let SlotContent::Ready(scene) = &mut slot.content else { return false };
        let requests = slot.state.click(scene, element, &mut self.rng);
        for request in requests {
            match request {
                BoardRequest::ToggleDiagram(target) => {
                    if let Some(slot) = self.slot_mut(&target) {
                        slot.visible = !slot.visible;
                        tracing::debug!("Diagram {target} visible={}", slot.visible);
                    }
                }
            }
        }
        true
    }

    /// Move the emulated hover to the next or previous interactive element.
    pub fn focus_step(&mut self, id: &DiagramId, forward: bool) -> Option<ElementId> {
        let slot = self.slot_mut(id)?;
        let SlotContent::Ready(scene) = &slot.content else { return None };
        slot.state.focus_step(scene, forward)
    }

    /// Click the element that currently has keyboard focus.
    pub fn activate_focused(&mut self, id: &DiagramId) -> bool {
        let Some(focused) = self.slot(id).and_then(|s| s.state.hovered().cloned()) else { return false };
        self.click(id, &focused)
    }

    /// Drop hover and focus on a diagram.
    pub fn blur(&mut self, id: &DiagramId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.state.clear();
            slot.drag = None;
        }
    }

    /// SVG document for a rendered diagram, `None` if it has no scene.
    pub fn export_svg(&self, id: &DiagramId) -> Option<Result<String>> {
        let slot = self.slot(id)?;
        slot.scene().map(|scene| svg::to_svg(scene, &slot.state))
    }
}

fn render_slot(renderer: &dyn Renderer, data: Option<&DataSet>) -> SlotContent {
    match renderer.render(data) {
        Ok(scene) => {
            tracing::debug!("Rendered diagram {} ({} elements)", renderer.id(), scene.elements.len());
            SlotContent::Ready(scene)
        }
        Err(e) => {
            tracing::warn!("Diagram {} failed to render: {e}", renderer.id());
            SlotContent::Failed(e.to_string())
        }
    }
}
