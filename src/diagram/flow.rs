//! Workflow and pipeline box-and-arrow diagrams defined in the deck file.
//!
//! Boxes sit in one row in declaration order. Forward arrows run straight
//! between neighbouring edges; arrows pointing back curve underneath the
//! row. Annotation arrows arc above the row inside a group that starts
//! hidden and is flipped by a small "notes" button.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::data::DataSet;
use super::interaction::{Action, Interaction};
use super::scene::{Color, Def, Element, Paint, Scene};
use super::shape::{Anchor, Path, Point, Rect, Segment, Shape, Text};
use super::Renderer;
use crate::error::{Error, Result};
use crate::types::{DiagramId, ElementId};

/// A labelled box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowBox {
    /// Box id, unique within the flow.
    pub id: String,
    /// Text inside the box.
    pub label: String,
    /// Diagram whose container a click on this box shows or hides.
    #[serde(default)]
    pub toggles: Option<DiagramId>,
}

/// A connection between two boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowArrow {
    /// Source box id.
    pub from: String,
    /// Target box id.
    pub to: String,
    /// Optional caption, used by annotations.
    #[serde(default)]
    pub label: String,
}

/// A workflow or pipeline diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSpec {
    /// Board id of the diagram.
    pub id: DiagramId,
    /// Caption drawn above the boxes.
    #[serde(default)]
    pub title: String,
    /// Boxes, left to right.
    pub boxes: Vec<FlowBox>,
    /// Main arrows.
    #[serde(default)]
    pub arrows: Vec<FlowArrow>,
    /// Arrows shown only when the notes are toggled on.
    #[serde(default)]
    pub annotations: Vec<FlowArrow>,
}

impl FlowSpec {
    /// Check box ids and arrow endpoints.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(Error::deck("flow without an id", "Every entry under \"flows\" needs an \"id\""));
        }
        if self.boxes.is_empty() {
            return Err(Error::deck(format!("flow '{}' has no boxes", self.id), "Add at least one box"));
        }
        let mut ids = HashSet::new();
        for b in &self.boxes {
            if !ids.insert(b.id.as_str()) {
                return Err(Error::deck(
                    format!("flow '{}' defines box '{}' twice", self.id, b.id),
                    "Box ids must be unique within a flow",
                ));
            }
        }
        for arrow in self.arrows.iter().chain(&self.annotations) {
            for end in [&arrow.from, &arrow.to] {
                if !ids.contains(end.as_str()) {
                    return Err(Error::deck(
                        format!("flow '{}' has an arrow to unknown box '{end}'", self.id),
                        "Arrow endpoints must name boxes of the same flow",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Diagrams named by clickable boxes.
    pub fn toggle_targets(&self) -> impl Iterator<Item = &DiagramId> {
        self.boxes.iter().filter_map(|b| b.toggles.as_ref())
    }

    /// Id of the annotation group.
    pub fn notes_group(&self) -> ElementId {
        ElementId::new(format!("{}-notes", self.id))
    }
}

/// Id of a flow box element.
pub fn box_id(id: &str) -> ElementId {
    ElementId::new(format!("flow-box-{id}"))
}

/// Id of a flow arrow element.
pub fn arrow_id(from: &str, to: &str) -> ElementId {
    ElementId::new(format!("flow-arrow-{from}-{to}"))
}

/// Id of the notes toggle button.
pub const NOTES_TOGGLE_ID: &str = "flow-notes-toggle";

const BOX_WIDTH: f64 = 120.0;
const BOX_HEIGHT: f64 = 50.0;
const GAP: f64 = 60.0;
const MARGIN: f64 = 20.0;
const ROW_Y: f64 = 90.0;
const HEIGHT: f64 = 210.0;
const MARKER: &str = "flow-arrowhead";

const BOX_FILL: Color = Color::rgb(0xf4, 0xf4, 0xf4);
const BOX_STROKE: Color = Color::rgb(0x2b, 0x2b, 0x2b);
const ACCENT: Color = Color::rgb(0xd9, 0x48, 0x01);
const NOTE: Color = Color::rgb(0x38, 0x6c, 0xb0);

fn box_left(index: usize) -> f64 {
    (BOX_WIDTH + GAP).mul_add(index as f64, MARGIN)
}

/// Renders a [`FlowSpec`].
#[derive(Debug, Clone)]
pub struct FlowRenderer {
    spec: FlowSpec,
}

impl FlowRenderer {
    /// Renderer for one flow.
    pub const fn new(spec: FlowSpec) -> Self {
        Self { spec }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.spec.boxes.iter().position(|b| b.id == id)
    }
}

impl Renderer for FlowRenderer {
    fn id(&self) -> DiagramId {
        self.spec.id.clone()
    }

    fn render(&self, _data: Option<&DataSet>) -> Result<Scene> {
        let n = self.spec.boxes.len();
        let width = 2.0f64.mul_add(MARGIN, n as f64 * BOX_WIDTH + n.saturating_sub(1) as f64 * GAP);
        let mut scene = Scene::new(width, HEIGHT);
        scene.defs.push(Def::Marker {
            id: MARKER.to_string(),
            size: 6.0,
            reference: Point::new(5.0, 3.0),
            path: Path::start(Point::new(0.0, 0.0))
                .then(Segment::LineTo(Point::new(6.0, 3.0)))
                .then(Segment::LineTo(Point::new(0.0, 6.0)))
                .then(Segment::Close),
            fill: BOX_STROKE,
        });

        if !self.spec.title.is_empty() {
            scene.push(Element::new(Shape::Text(
                Text::new(width / 2.0, 30.0, self.spec.title.clone(), 16.0).anchored(Anchor::Middle).bold(),
            )));
        }

        let mid_y = ROW_Y + BOX_HEIGHT / 2.0;
        for arrow in &self.spec.arrows {
            let (Some(a), Some(b)) = (self.index_of(&arrow.from), self.index_of(&arrow.to)) else {
                continue;
            };
            let path = if b > a {
                Path::start(Point::new(box_left(a) + BOX_WIDTH, mid_y))
                    .then(Segment::Horizontal(box_left(b) - 2.0))
            } else {
                let from = Point::new(box_left(a) + BOX_WIDTH / 2.0, ROW_Y + BOX_HEIGHT);
                let to = Point::new(box_left(b) + BOX_WIDTH / 2.0, ROW_Y + BOX_HEIGHT + 2.0);
                let dip = ROW_Y + BOX_HEIGHT + 60.0;
                Path::start(from).then(Segment::Cubic {
                    c1: Point::new(from.x, dip),
                    c2: Point::new(to.x, dip),
                    to,
                })
            };
            scene.push(
                Element::new(Shape::Path(path))
                    .with_id(arrow_id(&arrow.from, &arrow.to))
                    .with_class("flow-arrow")
                    .with_paint(Paint::stroked(BOX_STROKE, 2.0).with_marker(MARKER))
                    .on_hover(Paint::stroked(ACCENT, 3.0).with_marker(MARKER)),
            );
        }

        for (i, b) in self.spec.boxes.iter().enumerate() {
            let id = box_id(&b.id);
            let mut element = Element::new(Shape::Rect(Rect { rx: 6.0, ..Rect::new(box_left(i), ROW_Y, BOX_WIDTH, BOX_HEIGHT) }))
                .with_id(id.clone())
                .with_class("flow-box")
                .with_paint(Paint::filled(BOX_FILL).with_stroke(BOX_STROKE, 1.5))
                .on_hover(Paint::filled(BOX_FILL).with_stroke(ACCENT, 3.0));
            if let Some(target) = &b.toggles {
                element = element.with_class("clickable");
                scene.interactions.push(Interaction::click(id.clone(), Action::ToggleDiagram(target.clone())));
            }
            scene.push(element);
            scene.push(Element::new(Shape::Text(
                Text::new(box_left(i) + BOX_WIDTH / 2.0, mid_y + 5.0, b.label.clone(), 13.0).anchored(Anchor::Middle),
            )));

            let outgoing: Vec<ElementId> = self
                .spec
                .arrows
                .iter()
                .filter(|a| a.from == b.id)
                .map(|a| arrow_id(&a.from, &a.to))
                .collect();
            if !outgoing.is_empty() {
                scene.interactions.push(Interaction::hover(id, Action::Highlight(outgoing)));
            }
        }

        if !self.spec.annotations.is_empty() {
            let group = self.spec.notes_group();
            scene.add_group(group.clone(), true);
            for note in &self.spec.annotations {
                let (Some(a), Some(b)) = (self.index_of(&note.from), self.index_of(&note.to)) else {
                    continue;
                };
                let from = Point::new(box_left(a) + BOX_WIDTH / 2.0, ROW_Y);
                let to = Point::new(box_left(b) + BOX_WIDTH / 2.0, ROW_Y - 2.0);
                let apex = Point::new((from.x + to.x) / 2.0, ROW_Y - 70.0);
                scene.push(
                    Element::new(Shape::Path(Path::start(from).then(Segment::Quad { ctrl: apex, to })))
                        .with_class("flow-annotation")
                        .with_paint(Paint::stroked(NOTE, 1.5).dashed(&[6.0, 4.0]).with_marker(MARKER))
                        .in_group(&group),
                );
                if !note.label.is_empty() {
                    scene.push(
                        Element::new(Shape::Text(
                            Text::new(apex.x, ROW_Y - 38.0, note.label.clone(), 11.0).anchored(Anchor::Middle),
                        ))
                        .with_paint(Paint::filled(NOTE))
                        .in_group(&group),
                    );
                }
            }

            let toggle = ElementId::new(NOTES_TOGGLE_ID);
            scene.push(
                Element::new(Shape::Rect(Rect { rx: 4.0, ..Rect::new(width - 70.0, 6.0, 60.0, 22.0) }))
                    .with_id(toggle.clone())
                    .with_class("clickable")
                    .with_paint(Paint::filled(Color::WHITE).with_stroke(NOTE, 1.0))
                    .on_hover(Paint::filled(NOTE.with_alpha(0.2)).with_stroke(NOTE, 2.0)),
            );
            scene.push(Element::new(Shape::Text(
                Text::new(width - 40.0, 21.0, "notes", 11.0).anchored(Anchor::Middle),
            )));
            scene.interactions.push(Interaction::click(toggle, Action::ToggleGroup(group)));
        }

        Ok(scene)
    }
}
