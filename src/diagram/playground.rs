//! Shape playground: colour cycling, drag and drop, and random bars.

use super::data::DataSet;
use super::drag::DRAGGABLE_CLASS;
use super::interaction::{Action, Interaction};
use super::scene::{Color, Element, Paint, Scene};
use super::shape::{Anchor, Circle, Ellipse, Point, Polygon, Rect, Shape, Text};
use super::Renderer;
use crate::error::Result;
use crate::types::{DiagramId, ElementId};

const PANEL_WIDTH: f64 = 400.0;
const HEIGHT: f64 = 340.0;

/// Bottom edge of every bar.
pub const BAR_BASELINE: f64 = 300.0;
const BAR_MIN: f64 = 50.0;
const BAR_SPAN: f64 = 150.0;
const BAR_WIDTH: f64 = 50.0;
const BAR_HEIGHTS: [f64; 5] = [120.0, 180.0, 90.0, 150.0, 200.0];

const PALETTES: [[&str; 4]; 3] = [
    ["#e41a1c", "#377eb8", "#4daf4a", "#984ea3"],
    ["#ff7f00", "#ffff33", "#a65628", "#f781bf"],
    ["#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3"],
];

fn palette(colors: &[&str]) -> Vec<Color> {
    colors.iter().filter_map(|c| Color::from_hex(c)).collect()
}

/// Id of the n-th colour-cycling circle.
pub fn circle_id(n: usize) -> ElementId {
    ElementId::new(format!("color-circle-{n}"))
}

/// Id of the n-th bar.
pub fn bar_id(n: usize) -> ElementId {
    ElementId::new(format!("bar-{n}"))
}

/// The `playground` diagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct Playground;

impl Playground {
    fn colors(scene: &mut Scene) {
        for (i, colors) in PALETTES.iter().enumerate() {
            let colors = palette(colors);
            let Some(first) = colors.first().copied() else { continue };
            let id = circle_id(i + 1);
            scene.push(
                Element::new(Shape::Circle(Circle { cx: 80.0 + i as f64 * 120.0, cy: 150.0, r: 45.0 }))
                    .with_id(id.clone())
                    .with_class("interactive-circle")
                    .with_paint(Paint::filled(first).with_stroke(Color::BLACK, 2.0)),
            );
            scene.interactions.push(Interaction::click(id, Action::CycleFill(colors)));
        }
        scene.push(Element::new(Shape::Text(
            Text::new(PANEL_WIDTH / 2.0, 260.0, "Click a circle", 14.0).anchored(Anchor::Middle),
        )));
    }

    fn shapes(scene: &mut Scene) {
        let origin = Point::new(PANEL_WIDTH, 0.0);
        let paint = |hex: &str| Paint::filled(Color::from_hex(hex).unwrap_or(Color::BLACK)).with_stroke(Color::BLACK, 2.0);
        let shapes = [
            ("drag-rect", Shape::Rect(Rect::new(40.0, 60.0, 90.0, 70.0)), "#1f77b4"),
            ("drag-circle", Shape::Circle(Circle { cx: 260.0, cy: 100.0, r: 40.0 }), "#ff7f0e"),
            (
                "drag-polygon",
                Shape::Polygon(Polygon {
                    points: vec![Point::new(90.0, 180.0), Point::new(140.0, 270.0), Point::new(40.0, 270.0)],
                }),
                "#2ca02c",
            ),
            ("drag-ellipse", Shape::Ellipse(Ellipse { cx: 270.0, cy: 230.0, rx: 70.0, ry: 35.0 }), "#d62728"),
        ];
        for (id, shape, color) in shapes {
            scene.push(
                Element::new(shape).with_id(id).with_class(DRAGGABLE_CLASS).with_paint(paint(color)).at(origin),
            );
        }
    }

    fn bars(scene: &mut Scene) {
        let origin = Point::new(PANEL_WIDTH * 2.0, 0.0);
        let steel = Color::rgb(0x46, 0x82, 0xb4);
        for (i, height) in BAR_HEIGHTS.iter().enumerate() {
            let id = bar_id(i + 1);
            scene.push(
                Element::new(Shape::Rect(Rect::new(
                    30.0 + i as f64 * (BAR_WIDTH + 20.0),
                    BAR_BASELINE - height,
                    BAR_WIDTH,
                    *height,
                )))
                .with_id(id.clone())
                .with_class("bar")
                .with_paint(Paint::filled(steel))
                .on_hover(Paint::filled(Color::rgb(0xff, 0x8c, 0x00)))
                .at(origin),
            );
            scene.interactions.push(Interaction::click(
                id,
                Action::RandomizeHeight { baseline: BAR_BASELINE, min: BAR_MIN, span: BAR_SPAN },
            ));
        }
    }
}

impl Renderer for Playground {
    fn id(&self) -> DiagramId {
        DiagramId::new("playground")
    }

    fn render(&self, _data: Option<&DataSet>) -> Result<Scene> {
        let mut scene = Scene::new(PANEL_WIDTH * 3.0, HEIGHT);
        Self::colors(&mut scene);
        Self::shapes(&mut scene);
        Self::bars(&mut scene);
        Ok(scene)
    }
}
