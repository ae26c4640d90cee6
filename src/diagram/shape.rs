//! Shape geometry and the drag capability.

use std::fmt::Write as _;
use std::ops::{Add, Sub};

/// A point in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to_segment(self, a: Self, b: Self) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx.mul_add(dx, dy * dy);
        let t = if len_sq == 0.0 {
            0.0
        } else {
            ((self.x - a.x).mul_add(dx, (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let (px, py) = (t.mul_add(dx, a.x), t.mul_add(dy, a.y));
        (self.x - px).hypot(self.y - py)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Bounds {
    fn of_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        if min.x > max.x {
            return Self::default();
        }
        Self { x: min.x, y: min.y, width: max.x - min.x, height: max.y - min.y }
    }

    /// Centre point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a point falls inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Something the presenter can pick up and move.
pub trait Draggable {
    /// Reference position used as the drag anchor.
    fn position(&self) -> Point;
    /// Move so that [`Draggable::position`] becomes `p`.
    fn set_position(&mut self, p: Point);
}

/// `<rect>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Corner radius.
    pub rx: f64,
}

impl Rect {
    /// Rectangle without rounded corners.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rx: 0.0 }
    }
}

impl Draggable for Rect {
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
    fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// `<circle>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    /// Centre x.
    pub cx: f64,
    /// Centre y.
    pub cy: f64,
    /// Radius.
    pub r: f64,
}

impl Draggable for Circle {
    fn position(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
    fn set_position(&mut self, p: Point) {
        self.cx = p.x;
        self.cy = p.y;
    }
}

/// `<ellipse>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ellipse {
    /// Centre x.
    pub cx: f64,
    /// Centre y.
    pub cy: f64,
    /// Horizontal radius.
    pub rx: f64,
    /// Vertical radius.
    pub ry: f64,
}

impl Draggable for Ellipse {
    fn position(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
    fn set_position(&mut self, p: Point) {
        self.cx = p.x;
        self.cy = p.y;
    }
}

/// `<polygon>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Vertices in order.
    pub points: Vec<Point>,
}

impl Draggable for Polygon {
    fn position(&self) -> Point {
        Bounds::of_points(self.points.iter().copied()).center()
    }
    fn set_position(&mut self, p: Point) {
        let delta = p - self.position();
        for point in &mut self.points {
            *point = *point + delta;
        }
    }
}

/// One command of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// `M`
    MoveTo(Point),
    /// `L`
    LineTo(Point),
    /// `H`
    Horizontal(f64),
    /// `V`
    Vertical(f64),
    /// `Q`
    Quad {
        /// Control point.
        ctrl: Point,
        /// End point.
        to: Point,
    },
    /// `C`
    Cubic {
        /// First control point.
        c1: Point,
        /// Second control point.
        c2: Point,
        /// End point.
        to: Point,
    },
    /// `Z`
    Close,
}

/// `<path>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    /// Commands in order.
    pub segments: Vec<Segment>,
}

const CURVE_STEPS: usize = 16;

impl Path {
    /// Start a path at a point.
    pub fn start(p: Point) -> Self {
        Self { segments: vec![Segment::MoveTo(p)] }
    }

    /// Append a command.
    #[must_use]
    pub fn then(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// SVG `d` attribute.
    pub fn to_d(&self) -> String {
        let mut d = String::new();
        for seg in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match seg {
                Segment::MoveTo(p) => write!(d, "M{},{}", num(p.x), num(p.y)),
                Segment::LineTo(p) => write!(d, "L{},{}", num(p.x), num(p.y)),
                Segment::Horizontal(x) => write!(d, "H{}", num(*x)),
                Segment::Vertical(y) => write!(d, "V{}", num(*y)),
                Segment::Quad { ctrl, to } => {
                    write!(d, "Q{},{} {},{}", num(ctrl.x), num(ctrl.y), num(to.x), num(to.y))
                }
                Segment::Cubic { c1, c2, to } => write!(
                    d,
                    "C{},{} {},{} {},{}",
                    num(c1.x),
                    num(c1.y),
                    num(c2.x),
                    num(c2.y),
                    num(to.x),
                    num(to.y)
                ),
                Segment::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Approximate the path with polylines, one per subpath.
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut lines: Vec<Vec<Point>> = Vec::new();
        let mut cursor = Point::default();
        let mut start = Point::default();
        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(p) => {
                    cursor = p;
                    start = p;
                    lines.push(vec![p]);
                }
                Segment::LineTo(p) => {
                    cursor = p;
                    push_point(&mut lines, p);
                }
                Segment::Horizontal(x) => {
                    cursor = Point::new(x, cursor.y);
                    push_point(&mut lines, cursor);
                }
                Segment::Vertical(y) => {
                    cursor = Point::new(cursor.x, y);
                    push_point(&mut lines, cursor);
                }
                Segment::Quad { ctrl, to } => {
                    let from = cursor;
                    for i in 1..=CURVE_STEPS {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let u = 1.0 - t;
                        push_point(
                            &mut lines,
                            Point::new(
                                u * u * from.x + 2.0 * u * t * ctrl.x + t * t * to.x,
                                u * u * from.y + 2.0 * u * t * ctrl.y + t * t * to.y,
                            ),
                        );
                    }
                    cursor = to;
                }
                Segment::Cubic { c1, c2, to } => {
                    let from = cursor;
                    for i in 1..=CURVE_STEPS {
                        let t = i as f64 / CURVE_STEPS as f64;
                        let u = 1.0 - t;
                        let (a, b, c, e) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                        push_point(
                            &mut lines,
                            Point::new(
                                a * from.x + b * c1.x + c * c2.x + e * to.x,
                                a * from.y + b * c1.y + c * c2.y + e * to.y,
                            ),
                        );
                    }
                    cursor = to;
                }
                Segment::Close => {
                    cursor = start;
                    push_point(&mut lines, start);
                }
            }
        }
        lines
    }
}

fn push_point(lines: &mut Vec<Vec<Point>>, p: Point) {
    match lines.last_mut() {
        Some(line) => line.push(p),
        None => lines.push(vec![p]),
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// `start`
    #[default]
    Start,
    /// `middle`
    Middle,
    /// `end`
    End,
}

impl Anchor {
    /// SVG `text-anchor` value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// `<text>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    /// Anchor x.
    pub x: f64,
    /// Baseline y.
    pub y: f64,
    /// Content.
    pub content: String,
    /// Alignment.
    pub anchor: Anchor,
    /// Font size in scene units.
    pub font_size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Rotation in degrees around the anchor.
    pub rotate: Option<f64>,
}

impl Text {
    /// Text at a point with a font size.
    pub fn new(x: f64, y: f64, content: impl Into<String>, font_size: f64) -> Self {
        Self { x, y, content: content.into(), font_size, ..Self::default() }
    }

    /// Set the alignment.
    #[must_use]
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Use bold weight.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn bounds(&self) -> Bounds {
        let width = self.font_size * 0.6 * self.content.chars().count() as f64;
        let left = match self.anchor {
            Anchor::Start => self.x,
            Anchor::Middle => self.x - width / 2.0,
            Anchor::End => self.x - width,
        };
        Bounds { x: left, y: self.y - self.font_size, width, height: self.font_size }
    }
}

/// Any drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// `<rect>`
    Rect(Rect),
    /// `<circle>`
    Circle(Circle),
    /// `<ellipse>`
    Ellipse(Ellipse),
    /// `<polygon>`
    Polygon(Polygon),
    /// `<path>`
    Path(Path),
    /// `<text>`
    Text(Text),
}

/// How close a pointer must be to a stroke-only path to hit it.
const PATH_HIT_TOLERANCE: f64 = 4.0;

impl Shape {
    /// SVG tag name.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::Circle(_) => "circle",
            Self::Ellipse(_) => "ellipse",
            Self::Polygon(_) => "polygon",
            Self::Path(_) => "path",
            Self::Text(_) => "text",
        }
    }

    /// Drag capability, for the shapes that have one.
    pub fn draggable_mut(&mut self) -> Option<&mut dyn Draggable> {
        match self {
            Self::Rect(s) => Some(s),
            Self::Circle(s) => Some(s),
            Self::Ellipse(s) => Some(s),
            Self::Polygon(s) => Some(s),
            Self::Path(_) | Self::Text(_) => None,
        }
    }

    /// Bounding box in local coordinates.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rect(r) => Bounds { x: r.x, y: r.y, width: r.width, height: r.height },
            Self::Circle(c) => Bounds { x: c.cx - c.r, y: c.cy - c.r, width: 2.0 * c.r, height: 2.0 * c.r },
            Self::Ellipse(e) => Bounds { x: e.cx - e.rx, y: e.cy - e.ry, width: 2.0 * e.rx, height: 2.0 * e.ry },
            Self::Polygon(p) => Bounds::of_points(p.points.iter().copied()),
            Self::Path(p) => Bounds::of_points(p.flatten().into_iter().flatten()),
            Self::Text(t) => t.bounds(),
        }
    }

    /// Hit test in local coordinates.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(_) | Self::Text(_) => self.bounds().contains(p),
            Self::Circle(c) => (p.x - c.cx).hypot(p.y - c.cy) <= c.r,
            Self::Ellipse(e) => {
                if e.rx <= 0.0 || e.ry <= 0.0 {
                    return false;
                }
                let (dx, dy) = ((p.x - e.cx) / e.rx, (p.y - e.cy) / e.ry);
                dx.mul_add(dx, dy * dy) <= 1.0
            }
            Self::Polygon(poly) => polygon_contains(&poly.points, p),
            Self::Path(path) => path.flatten().iter().any(|line| {
                line.windows(2).any(|w| p.distance_to_segment(w[0], w[1]) <= PATH_HIT_TOLERANCE)
            }),
        }
    }
}

fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Format a coordinate compactly: at most two decimals, no trailing zeros.
pub fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn triangle() -> Shape {
        Shape::Polygon(Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
        })
    }

    #[test]
    fn every_draggable_shape_moves_through_the_capability() {
        let mut shapes = vec![
            Shape::Rect(Rect::new(0.0, 0.0, 4.0, 4.0)),
            Shape::Circle(Circle { cx: 1.0, cy: 1.0, r: 2.0 }),
            Shape::Ellipse(Ellipse { cx: 1.0, cy: 1.0, rx: 2.0, ry: 1.0 }),
            triangle(),
        ];
        for shape in &mut shapes {
            let handle = shape.draggable_mut().expect("draggable");
            handle.set_position(Point::new(50.0, 60.0));
            assert_eq!(handle.position(), Point::new(50.0, 60.0), "{}", shape.tag());
        }
    }

    #[test]
    fn polygon_drag_translates_every_vertex() {
        let mut shape = triangle();
        let handle = shape.draggable_mut().unwrap();
        let before = handle.position();
        handle.set_position(before + Point::new(5.0, -2.0));
        let Shape::Polygon(poly) = shape else { panic!("polygon") };
        assert_eq!(poly.points[0], Point::new(5.0, -2.0));
        assert_eq!(poly.points[2], Point::new(5.0, 8.0));
    }

    #[test]
    fn paths_and_text_are_not_draggable() {
        let mut path = Shape::Path(Path::start(Point::default()));
        assert!(path.draggable_mut().is_none());
        let mut text = Shape::Text(Text::new(0.0, 0.0, "hi", 10.0));
        assert!(text.draggable_mut().is_none());
    }

    #[test]
    fn hit_tests() {
        assert!(triangle().contains(Point::new(2.0, 2.0)));
        assert!(!triangle().contains(Point::new(8.0, 8.0)));
        let circle = Shape::Circle(Circle { cx: 0.0, cy: 0.0, r: 5.0 });
        assert!(circle.contains(Point::new(3.0, 3.0)));
        assert!(!circle.contains(Point::new(4.0, 4.0)));
        let path = Shape::Path(Path::start(Point::new(0.0, 0.0)).then(Segment::Horizontal(100.0)));
        assert!(path.contains(Point::new(50.0, 3.0)));
        assert!(!path.contains(Point::new(50.0, 10.0)));
    }

    #[test]
    fn path_d_and_flatten() {
        let path = Path::start(Point::new(1.0, 2.5))
            .then(Segment::Vertical(10.0))
            .then(Segment::Horizontal(4.0));
        assert_eq!(path.to_d(), "M1,2.5 V10 H4");
        assert_eq!(
            path.flatten(),
            vec![vec![Point::new(1.0, 2.5), Point::new(1.0, 10.0), Point::new(4.0, 10.0)]]
        );

        let curve = Path::start(Point::new(0.0, 0.0))
            .then(Segment::Quad { ctrl: Point::new(5.0, -10.0), to: Point::new(10.0, 0.0) });
        let line = &curve.flatten()[0];
        assert_eq!(line.len(), CURVE_STEPS + 1);
        assert_eq!(line.last().copied(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(2.456), "2.46");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(10.5), "10.5");
    }
}
