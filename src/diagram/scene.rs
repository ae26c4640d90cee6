//! Retained scene model shared by every renderer.
//!
//! A [`Scene`] is what a renderer produces and what both the terminal canvas
//! and the SVG writer consume. Elements keep their ids so hover and click
//! interactions can refer to each other by name.

use std::fmt;

use super::interaction::Interaction;
use super::shape::{Bounds, Path, Point, Shape};
use crate::types::ElementId;

/// Class for elements the pointer passes through.
pub const PASSIVE_CLASS: &str = "no-pointer";

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity, 0 to 1.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Linear interpolation in RGB space.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a < 1.0 {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, super::shape::num(self.a))
        } else {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

/// Fill or stroke source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fill {
    /// Nothing painted.
    #[default]
    None,
    /// A flat colour.
    Solid(Color),
    /// Reference to a definition (`url(#id)`).
    Url(String),
}

impl Fill {
    /// Flat colour, if any.
    pub const fn color(&self) -> Option<Color> {
        match self {
            Self::Solid(c) => Some(*c),
            Self::None | Self::Url(_) => None,
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Solid(c) => write!(f, "{c}"),
            Self::Url(id) => write!(f, "url(#{id})"),
        }
    }
}

impl From<Color> for Fill {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

/// Presentation attributes of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    /// Interior fill.
    pub fill: Fill,
    /// Outline.
    pub stroke: Fill,
    /// Outline width.
    pub stroke_width: f64,
    /// Element opacity.
    pub opacity: f64,
    /// Dash pattern.
    pub dash: Option<Vec<f64>>,
    /// Marker drawn at the path end.
    pub marker_end: Option<String>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Fill::Solid(Color::BLACK),
            stroke: Fill::None,
            stroke_width: 1.0,
            opacity: 1.0,
            dash: None,
            marker_end: None,
        }
    }
}

impl Paint {
    /// Filled, no outline.
    pub fn filled(color: Color) -> Self {
        Self { fill: Fill::Solid(color), ..Self::default() }
    }

    /// Outline only.
    pub fn stroked(color: Color, width: f64) -> Self {
        Self { fill: Fill::None, stroke: Fill::Solid(color), stroke_width: width, ..Self::default() }
    }

    /// Add an outline.
    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<Fill>, width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = width;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Dash the outline.
    #[must_use]
    pub fn dashed(mut self, pattern: &[f64]) -> Self {
        self.dash = Some(pattern.to_vec());
        self
    }

    /// End the path with a marker definition.
    #[must_use]
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker_end = Some(marker.to_string());
        self
    }
}

/// Paint an element switches to while hovered or highlighted.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverStyle {
    /// Replacement paint.
    pub paint: Paint,
}

/// One identified shape in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Contract id, if other elements refer to this one.
    pub id: Option<ElementId>,
    /// CSS-like classes (`draggable`, `node`, ...).
    pub classes: Vec<String>,
    /// Geometry in local coordinates.
    pub shape: Shape,
    /// Normal paint.
    pub paint: Paint,
    /// Translation applied to the shape.
    pub offset: Point,
    /// Group the element belongs to.
    pub group: Option<ElementId>,
    /// Highlight paint.
    pub hover: Option<HoverStyle>,
}

impl Element {
    /// Unstyled element at the origin.
    pub fn new(shape: Shape) -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            shape,
            paint: Paint::default(),
            offset: Point::default(),
            group: None,
            hover: None,
        }
    }

    /// Attach an id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set the normal paint.
    #[must_use]
    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    /// Translate by an offset.
    #[must_use]
    pub fn at(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Put the element in a group.
    #[must_use]
    pub fn in_group(mut self, group: &ElementId) -> Self {
        self.group = Some(group.clone());
        self
    }

    /// Set the highlight paint.
    #[must_use]
    pub fn on_hover(mut self, paint: Paint) -> Self {
        self.hover = Some(HoverStyle { paint });
        self
    }

    /// Whether the element carries a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Bounds in scene coordinates.
    pub fn bounds(&self) -> Bounds {
        let b = self.shape.bounds();
        Bounds { x: b.x + self.offset.x, y: b.y + self.offset.y, ..b }
    }

    /// Hit test in scene coordinates.
    pub fn contains(&self, p: Point) -> bool {
        self.shape.contains(p - self.offset)
    }
}

/// A gradient stop, `offset` in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    /// Position along the gradient.
    pub offset: f64,
    /// Colour at that position.
    pub color: Color,
}

/// Reusable paint servers.
#[derive(Debug, Clone, PartialEq)]
pub enum Def {
    /// `<linearGradient>` from `from` to `to` in bounding-box units.
    LinearGradient {
        /// Reference id.
        id: String,
        /// Start point, 0..=1.
        from: Point,
        /// End point, 0..=1.
        to: Point,
        /// Colour stops.
        stops: Vec<Stop>,
    },
    /// `<pattern>` of user-space tiles.
    Pattern {
        /// Reference id.
        id: String,
        /// Tile width.
        width: f64,
        /// Tile height.
        height: f64,
        /// Tile rotation in degrees.
        rotate: f64,
        /// Tile content.
        content: Vec<Element>,
    },
    /// `<marker>` for path ends.
    Marker {
        /// Reference id.
        id: String,
        /// `viewBox` side; the marker is square.
        size: f64,
        /// Anchor point in marker units.
        reference: Point,
        /// Marker shape.
        path: Path,
        /// Marker fill.
        fill: Color,
    },
}

impl Def {
    /// Reference id.
    pub fn id(&self) -> &str {
        match self {
            Self::LinearGradient { id, .. } | Self::Pattern { id, .. } | Self::Marker { id, .. } => id,
        }
    }
}

/// A named group that can be shown or hidden as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group id.
    pub id: ElementId,
    /// Whether the group is hidden.
    pub hidden: bool,
}

/// Everything one diagram draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
    /// Paint servers.
    pub defs: Vec<Def>,
    /// Toggleable groups.
    pub groups: Vec<Group>,
    /// Elements in paint order.
    pub elements: Vec<Element>,
    /// Hover and click wiring.
    pub interactions: Vec<Interaction>,
}

impl Scene {
    /// Empty scene with a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// Append an element; returns its paint index.
    pub fn push(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Declare a group.
    pub fn add_group(&mut self, id: ElementId, hidden: bool) {
        self.groups.push(Group { id, hidden });
    }

    /// Paint index of an element id.
    pub fn find(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id.as_ref() == Some(id))
    }

    /// Element by id.
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.find(id).and_then(|i| self.elements.get(i))
    }

    /// Element by id, mutably.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.find(id).and_then(|i| self.elements.get_mut(i))
    }

    /// Whether a group is hidden. Unknown groups are visible.
    pub fn group_hidden(&self, id: &ElementId) -> bool {
        self.groups.iter().any(|g| &g.id == id && g.hidden)
    }

    /// Whether an element is drawn.
    pub fn is_visible(&self, element: &Element) -> bool {
        element.group.as_ref().map_or(true, |g| !self.group_hidden(g))
    }

    fn is_pointable(&self, element: &Element) -> bool {
        !matches!(element.shape, Shape::Text(_)) && !element.has_class(PASSIVE_CLASS) && self.is_visible(element)
    }

    /// Flip a group's visibility; returns the new hidden state.
    pub fn toggle_group(&mut self, id: &ElementId) -> Option<bool> {
        let group = self.groups.iter_mut().find(|g| &g.id == id)?;
        group.hidden = !group.hidden;
        Some(group.hidden)
    }

    /// Move an element to the end of the paint order. Returns its new index.
    pub fn raise(&mut self, index: usize) -> usize {
        if index < self.elements.len() {
            let element = self.elements.remove(index);
            self.elements.push(element);
            self.elements.len() - 1
        } else {
            index
        }
    }

    /// Topmost visible element under a point.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.elements
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| self.is_pointable(e) && e.contains(p))
            .map(|(i, _)| i)
    }

    /// Topmost visible element under a point that has an id.
    pub fn hit_test_id(&self, p: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| self.is_pointable(e))
            .find(|e| e.id.is_some() && e.contains(p))
            .and_then(|e| e.id.clone())
    }

    /// Ids that have at least one interaction and are visible, in paint order.
    pub fn interactive_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = Vec::new();
        for element in &self.elements {
            let Some(id) = &element.id else { continue };
            if !self.is_pointable(element) || ids.contains(id) {
                continue;
            }
            if element.hover.is_some() || self.interactions.iter().any(|i| &i.trigger == id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Definition by id.
    pub fn def(&self, id: &str) -> Option<&Def> {
        self.defs.iter().find(|d| d.id() == id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::diagram::shape::{Circle, Rect, Text};

    #[test]
    fn hex_and_display() {
        assert_eq!(Color::from_hex("#17542e"), Some(Color::rgb(0x17, 0x54, 0x2e)));
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(Color::BLACK.with_alpha(0.5).to_string(), "rgba(0,0,0,0.5)");
        assert_eq!(Fill::Url("stripes".into()).to_string(), "url(#stripes)");
    }

    #[test]
    fn from_hex_rejects_multibyte_digits() {
        // each of these splits a two-byte character at a channel boundary
        assert_eq!(Color::from_hex("#1é234"), None);
        assert_eq!(Color::from_hex("#1é"), None);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::rgb(0, 0, 0);
        let b = Color::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(100, 50, 25));
    }

    fn scene() -> Scene {
        let mut scene = Scene::new(100.0, 100.0);
        let group = ElementId::new("g");
        scene.add_group(group.clone(), true);
        scene.push(Element::new(Shape::Rect(Rect::new(0.0, 0.0, 50.0, 50.0))).with_id("back"));
        scene.push(
            Element::new(Shape::Circle(Circle { cx: 10.0, cy: 10.0, r: 5.0 }))
                .with_id("hidden")
                .in_group(&group),
        );
        scene.push(Element::new(Shape::Text(Text::new(0.0, 20.0, "label", 12.0))));
        scene
    }

    #[test]
    fn hit_test_skips_hidden_groups_and_text() {
        let mut scene = scene();
        assert_eq!(scene.hit_test_id(Point::new(10.0, 10.0)), Some(ElementId::new("back")));
        scene.toggle_group(&ElementId::new("g"));
        assert_eq!(scene.hit_test_id(Point::new(10.0, 10.0)), Some(ElementId::new("hidden")));
        assert_eq!(scene.hit_test(Point::new(90.0, 90.0)), None);
    }

    #[test]
    fn offset_applies_to_hits() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(
            Element::new(Shape::Rect(Rect::new(0.0, 0.0, 2.0, 2.0)))
                .with_id("r")
                .at(Point::new(5.0, 5.0)),
        );
        assert_eq!(scene.hit_test_id(Point::new(6.0, 6.0)), Some(ElementId::new("r")));
        assert_eq!(scene.hit_test_id(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn raise_moves_to_top() {
        let mut scene = scene();
        let idx = scene.raise(0);
        assert_eq!(idx, 2);
        assert_eq!(scene.find(&ElementId::new("back")), Some(2));
    }

    #[test]
    fn toggle_unknown_group() {
        let mut scene = scene();
        assert_eq!(scene.toggle_group(&ElementId::new("missing")), None);
        assert_eq!(scene.toggle_group(&ElementId::new("g")), Some(false));
    }
}
