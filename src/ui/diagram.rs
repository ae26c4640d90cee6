//! Scene rendering onto a braille canvas.
//!
//! Scene y grows downward, canvas y grows upward, so every y is flipped
//! against the scene height. Filled shapes are drawn as horizontal scanlines
//! at the canvas's vertical dot pitch.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line as TextLine,
    widgets::{
        canvas::{Canvas, Context, Line},
        Block, Paragraph, Wrap,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::DiagramArea;
use crate::diagram::interaction::InteractionState;
use crate::diagram::scene::{self, Element, Fill, Paint, Scene};
use crate::diagram::shape::{Anchor, Point, Shape};
use crate::diagram::{DiagramSlot, SlotContent};

const CURVE_STEPS: usize = 32;

/// Draw one diagram slot inside `block`. Returns the hit area for rendered
/// scenes.
pub fn draw_diagram(f: &mut Frame, slot: &DiagramSlot, block: Block<'_>, area: Rect) -> Option<DiagramArea> {
    let inner = block.inner(area);
    match &slot.content {
        SlotContent::Loading => {
            f.render_widget(
                Paragraph::new("Loading data…").style(Style::default().fg(Color::Yellow)).block(block),
                area,
            );
            None
        }
        SlotContent::Failed(message) => {
            f.render_widget(
                Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(block),
                area,
            );
            None
        }
        SlotContent::Ready(scene) => {
            let step = scene.height / (f64::from(inner.height.max(1)) * 4.0);
            let cell_width = scene.width / f64::from(inner.width.max(1));
            let canvas = Canvas::default()
                .block(block)
                .marker(Marker::Braille)
                .x_bounds([0.0, scene.width])
                .y_bounds([0.0, scene.height])
                .paint(|ctx| paint_scene(ctx, scene, &slot.state, step, cell_width));
            f.render_widget(canvas, area);
            Some(DiagramArea {
                id: slot.id.clone(),
                area: inner,
                scene_width: scene.width,
                scene_height: scene.height,
            })
        }
    }
}

fn paint_scene(ctx: &mut Context<'_>, scene: &Scene, state: &InteractionState, step: f64, cell_width: f64) {
    let flip = |p: Point| Point::new(p.x, scene.height - p.y);
    for element in scene.elements.iter().filter(|e| scene.is_visible(e)) {
        let paint = effective_paint(element, state);
        if paint.opacity <= 0.0 {
            continue;
        }
        if let Shape::Text(text) = &element.shape {
            let at = flip(Point::new(text.x, text.y) + element.offset);
            let x = at.x - anchor_shift(text.anchor, &text.content) * cell_width;
            let color = paint.fill.color().map_or(Color::Reset, to_color);
            let mut style = Style::default().fg(color);
            if text.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            ctx.print(x, at.y, TextLine::styled(text.content.clone(), style));
            continue;
        }

        let outline = outline(&element.shape);
        if let Some(color) = solid(&paint.fill, scene) {
            if let Some(ring) = closed(&element.shape, &outline) {
                for (y, x0, x1) in scanlines(ring, step) {
                    let a = flip(Point::new(x0, y) + element.offset);
                    let b = flip(Point::new(x1, y) + element.offset);
                    ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
                }
            }
        }
        if let Some(color) = solid(&paint.stroke, scene) {
            for poly in &outline {
                for pair in poly.windows(2) {
                    let a = flip(pair[0] + element.offset);
                    let b = flip(pair[1] + element.offset);
                    ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
                }
            }
        }
    }
}

/// Cells to shift left so the label sits on its anchor.
fn anchor_shift(anchor: Anchor, content: &str) -> f64 {
    let width = content.width() as f64;
    match anchor {
        Anchor::Start => 0.0,
        Anchor::Middle => width / 2.0,
        Anchor::End => width,
    }
}

fn effective_paint<'a>(element: &'a Element, state: &InteractionState) -> &'a Paint {
    match (&element.id, &element.hover) {
        (Some(id), Some(hover)) if state.is_highlighted(id) => &hover.paint,
        _ => &element.paint,
    }
}

/// Terminal colour for a paint, resolving gradients and patterns to their
/// first colour.
fn solid(fill: &Fill, scene: &Scene) -> Option<Color> {
    match fill {
        Fill::None => None,
        Fill::Solid(c) => Some(to_color(*c)),
        Fill::Url(id) => match scene.def(id)? {
            scene::Def::LinearGradient { stops, .. } => stops.first().map(|s| to_color(s.color)),
            scene::Def::Pattern { .. } => Some(Color::Gray),
            scene::Def::Marker { fill, .. } => Some(to_color(*fill)),
        },
    }
}

/// Near-black ink is drawn in the terminal foreground so it stays readable
/// on dark backgrounds.
fn to_color(c: scene::Color) -> Color {
    if c.r.max(c.g).max(c.b) < 0x40 {
        Color::Reset
    } else {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Polylines tracing a shape's edge in local coordinates.
fn outline(shape: &Shape) -> Vec<Vec<Point>> {
    match shape {
        Shape::Rect(r) => vec![vec![
            Point::new(r.x, r.y),
            Point::new(r.x + r.width, r.y),
            Point::new(r.x + r.width, r.y + r.height),
            Point::new(r.x, r.y + r.height),
            Point::new(r.x, r.y),
        ]],
        Shape::Circle(c) => vec![ellipse_points(c.cx, c.cy, c.r, c.r)],
        Shape::Ellipse(e) => vec![ellipse_points(e.cx, e.cy, e.rx, e.ry)],
        Shape::Polygon(p) => {
            let mut points = p.points.clone();
            if let Some(first) = p.points.first() {
                points.push(*first);
            }
            vec![points]
        }
        Shape::Path(path) => path.flatten(),
        Shape::Text(_) => Vec::new(),
    }
}

fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Point> {
    (0..=CURVE_STEPS)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / CURVE_STEPS as f64;
            Point::new(rx.mul_add(t.cos(), cx), ry.mul_add(t.sin(), cy))
        })
        .collect()
}

/// The single closed ring of a fillable shape.
fn closed<'a>(shape: &Shape, outline: &'a [Vec<Point>]) -> Option<&'a [Point]> {
    match shape {
        Shape::Rect(_) | Shape::Circle(_) | Shape::Ellipse(_) | Shape::Polygon(_) => {
            outline.first().map(Vec::as_slice)
        }
        Shape::Path(_) | Shape::Text(_) => None,
    }
}

/// Even-odd horizontal spans covering a closed ring, one row every `step`.
fn scanlines(ring: &[Point], step: f64) -> Vec<(f64, f64, f64)> {
    if ring.len() < 3 || step <= 0.0 {
        return Vec::new();
    }
    let (min_y, max_y) = ring.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let mut spans = Vec::new();
    let mut y = min_y + step / 2.0;
    while y < max_y {
        let mut xs: Vec<f64> = ring
            .windows(2)
            .filter_map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                    Some(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x))
                } else {
                    None
                }
            })
            .collect();
        xs.sort_by(f64::total_cmp);
        spans.extend(xs.chunks_exact(2).map(|pair| (y, pair[0], pair[1])));
        y += step;
    }
    spans
}
