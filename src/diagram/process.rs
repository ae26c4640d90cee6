//! Process-model arc diagram.

use super::data::DataSet;
use super::scene::{Color, Def, Element, Paint, Scene, PASSIVE_CLASS};
use super::shape::{Anchor, Circle, Path, Point, Polygon, Rect, Segment, Shape, Text};
use super::Renderer;
use crate::error::Result;
use crate::types::{DiagramId, ElementId};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const NODE_RADIUS: f64 = 12.0;
const ARC_TOP_MARGIN: f64 = 120.0;
const SQUARE: f64 = 12.0;
const SQUARE_GAP: f64 = 2.0;
const SQUARES_PER_ROW: usize = 21;
/// Rows reserved for the sequence matrix; one more than the sequence fills.
const MATRIX_ROWS: usize = 5;
const ARROW: &str = "arrow-light";
const INK: Color = Color::rgb(0x2b, 0x2b, 0x2b);

/// Task colours indexed by task number; 0 is start/end.
pub const TASK_COLORS: [&str; 6] = ["#000000", "#7fc97f", "#beaed4", "#fdc086", "#adad2a", "#386cb0"];

struct Node {
    id: &'static str,
    x: f64,
    color: &'static str,
}

const NODES: [Node; 6] = [
    Node { id: "start", x: 40.0, color: "#000000" },
    Node { id: "1", x: 80.0, color: "#17542e" },
    Node { id: "2", x: 120.0, color: "#a0b0a7" },
    Node { id: "3", x: 160.0, color: "#c5b894" },
    Node { id: "4", x: 200.0, color: "#c59c94" },
    Node { id: "end", x: 240.0, color: "#000000" },
];

/// `(from, to, apex height, stroke width)`
const ARCS: [(&str, &str, f64, f64); 4] =
    [("start", "1", -60.0, 4.0), ("1", "end", -200.0, 3.0), ("1", "3", -100.0, 1.0), ("3", "end", -100.0, 1.0)];

const LEGEND: [(&str, &str); 5] = [
    ("#000000", "Start/End"),
    ("#17542e", "New InfoPanel"),
    ("#a0b0a7", "Revisit InfoPanel"),
    ("#c5b894", "Year Change"),
    ("#c59c94", "Gender Change"),
];

/// Task of every step in the example cluster's representative sequence.
pub fn sequence() -> Vec<usize> {
    [(2, 5), (33, 0), (5, 1), (1, 5), (15, 1), (1, 3), (27, 0)]
        .into_iter()
        .flat_map(|(count, task)| std::iter::repeat(task).take(count))
        .collect()
}

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::BLACK)
}

/// The `process-model` diagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessModel;

impl Renderer for ProcessModel {
    fn id(&self) -> DiagramId {
        DiagramId::new("process-model")
    }

    fn render(&self, _data: Option<&DataSet>) -> Result<Scene> {
        let mut scene = Scene::new(WIDTH, HEIGHT);
        let min = NODES[0].x;
        let max = NODES[NODES.len() - 1].x;
        let center_offset = WIDTH / 2.0 - (max - min) / 2.0 - min;
        let origin = Point::new(center_offset, ARC_TOP_MARGIN);

        scene.defs.push(Def::Marker {
            id: ARROW.to_string(),
            size: 8.0,
            reference: Point::new(7.0, 3.0),
            path: Path::start(Point::new(0.0, 0.0))
                .then(Segment::LineTo(Point::new(7.0, 3.0)))
                .then(Segment::LineTo(Point::new(0.0, 6.0)))
                .then(Segment::Close),
            fill: Color::rgb(0xcc, 0xcc, 0xcc),
        });

        let x_of = |id: &str| NODES.iter().find(|n| n.id == id).map(|n| n.x);
        for (from, to, apex, thickness) in ARCS {
            let (Some(x1), Some(x2)) = (x_of(from), x_of(to)) else { continue };
            let path = Path::start(Point::new(x1, 0.0))
                .then(Segment::Quad { ctrl: Point::new((x1 + x2) / 2.0, apex), to: Point::new(x2, 0.0) });
            scene.push(
                Element::new(Shape::Path(path))
                    .with_id(format!("process-arc-{from}-{to}"))
                    .with_class("process-arc")
                    .with_paint(Paint::stroked(INK, thickness).with_opacity(0.5).with_marker(ARROW))
                    .on_hover(Paint::stroked(INK, thickness + 1.0).with_marker(ARROW))
                    .at(origin),
            );
        }

        for (i, node) in NODES.iter().enumerate() {
            let at = Point::new(origin.x + node.x, origin.y);
            if i == 1 {
                scene.push(
                    Element::new(Shape::Circle(Circle { cx: 0.0, cy: 0.0, r: NODE_RADIUS + 2.0 }))
                        .with_class(PASSIVE_CLASS)
                        .with_paint(Paint::stroked(INK.with_alpha(0.25), 6.0))
                        .at(at),
                );
            }
            let color = hex(node.color);
            scene.push(
                Element::new(Shape::Circle(Circle { cx: 0.0, cy: 0.0, r: NODE_RADIUS }))
                    .with_id(format!("process-node-{}", node.id))
                    .with_class("process-node-circle")
                    .with_paint(Paint::filled(color))
                    // a same-colour outline reads as the circle growing by two units
                    .on_hover(Paint::filled(color).with_stroke(color, 4.0))
                    .at(at),
            );
            let symbol = match node.id {
                "start" => Some(start_symbol()),
                "end" => Some(end_symbol()),
                _ => None,
            };
            if let Some(shape) = symbol {
                scene.push(
                    Element::new(shape).with_class(PASSIVE_CLASS).with_paint(Paint::filled(Color::WHITE)).at(at),
                );
            }
        }

        let sequence = sequence();
        let step = SQUARE + SQUARE_GAP;
        let matrix_width = SQUARES_PER_ROW as f64 * SQUARE + (SQUARES_PER_ROW - 1) as f64 * SQUARE_GAP;
        let center = (min + max) / 2.0;
        let matrix = Point::new(origin.x + center - matrix_width / 2.0, origin.y + 30.0);
        for (i, task) in sequence.iter().enumerate() {
            let color = TASK_COLORS.get(*task).map_or(Color::BLACK, |c| hex(c));
            let x = (i % SQUARES_PER_ROW) as f64 * step;
            let y = (i / SQUARES_PER_ROW) as f64 * step;
            scene.push(
                Element::new(Shape::Rect(Rect { rx: 4.0, ..Rect::new(x, y, SQUARE, SQUARE) }))
                    .with_id(format!("process-square-{i}"))
                    .with_class("process-sequence-square")
                    .with_paint(Paint::filled(color))
                    .on_hover(Paint::filled(Color::WHITE))
                    .at(matrix),
            );
        }

        let labels = [
            (min - 100.0, 18.0, "Cluster ID", 24.0, true, Anchor::End),
            (min - 100.0, 34.0, "388", 18.0, false, Anchor::End),
            (max + 100.0, 18.0, "Cluster Size", 24.0, true, Anchor::Start),
            (max + 100.0, 38.0, "84", 18.0, false, Anchor::Start),
        ];
        for (x, y, text, size, bold, anchor) in labels {
            let mut t = Text::new(x, y, text, size).anchored(anchor);
            t.bold = bold;
            scene.push(Element::new(Shape::Text(t)).with_class("process-cluster-label").at(origin));
        }

        let legend_total = (LEGEND.len() - 1) as f64 * 20.0;
        let legend_y = 80.0 + MATRIX_ROWS as f64 * step;
        let legend = Point::new(origin.x + center - legend_total / 2.0, origin.y + legend_y);
        for (i, (color, label)) in LEGEND.iter().enumerate() {
            let dy = i as f64 * 20.0;
            scene.push(
                Element::new(Shape::Circle(Circle { cx: 0.0, cy: dy, r: 8.0 }))
                    .with_class("process-legend")
                    .with_class(PASSIVE_CLASS)
                    .with_paint(Paint::filled(hex(color)))
                    .at(legend),
            );
            scene.push(
                Element::new(Shape::Text(Text::new(12.0, dy + 5.0, *label, 14.0)))
                    .with_class("process-legend-label")
                    .at(legend),
            );
        }

        scene.push(
            Element::new(Shape::Text(
                Text::new(center_offset, legend_y + MATRIX_ROWS as f64 * step + 10.0, "Open InfoPanel \u{2192} End Exploration Behavior", 16.0)
                    .bold(),
            ))
            .with_class("process-title"),
        );

        Ok(scene)
    }
}

/// Triangle symbol of area 50, pointing right.
fn start_symbol() -> Shape {
    let y = -(50.0 / (3.0_f64.sqrt() * 3.0)).sqrt();
    let s = 3.0_f64.sqrt();
    // rotated a quarter turn: (x, y) -> (-y, x)
    let raw = [(0.0, y * 2.0), (-s * y, -y), (s * y, -y)];
    Shape::Polygon(Polygon { points: raw.iter().map(|&(px, py)| Point::new(-py, px)).collect() })
}

/// Square symbol of area 70.
fn end_symbol() -> Shape {
    let side = 70.0_f64.sqrt();
    Shape::Rect(Rect::new(-side / 2.0, -side / 2.0, side, side))
}

/// Element id of a sequence square.
pub fn square_id(i: usize) -> ElementId {
    ElementId::new(format!("process-square-{i}"))
}
