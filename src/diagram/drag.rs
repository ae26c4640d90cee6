//! Pointer drag controller.
//!
//! The controller only talks to [`Draggable`](super::shape::Draggable); the
//! shape kind decides what "position" means.

use super::scene::Scene;
use super::shape::Point;

/// Class that marks an element as draggable.
pub const DRAGGABLE_CLASS: &str = "draggable";

/// An element being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    element: usize,
    grab: Point,
}

impl DragSession {
    /// Pick up the topmost draggable element under `pointer`.
    ///
    /// The element is raised to the top of the paint order, and the offset
    /// between pointer and element position is kept for the whole drag.
    pub fn begin(scene: &mut Scene, pointer: Point) -> Option<Self> {
        let hit = scene.hit_test(pointer)?;
        if !scene.elements.get(hit)?.has_class(DRAGGABLE_CLASS) {
            return None;
        }
        let element = scene.raise(hit);
        let el = scene.elements.get_mut(element)?;
        let local = pointer - el.offset;
        let position = el.shape.draggable_mut()?.position();
        tracing::debug!("Drag start on element {element}");
        Some(Self { element, grab: local - position })
    }

    /// Follow the pointer.
    pub fn drag_to(&self, scene: &mut Scene, pointer: Point) {
        if let Some(el) = scene.elements.get_mut(self.element) {
            let local = pointer - el.offset;
            if let Some(handle) = el.shape.draggable_mut() {
                handle.set_position(local - self.grab);
            }
        }
    }

    /// Paint index of the dragged element.
    pub const fn element(&self) -> usize {
        self.element
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::diagram::scene::Element;
    use crate::diagram::shape::{Ellipse, Rect, Shape};

    #[test]
    fn drag_keeps_grab_offset() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Element::new(Shape::Rect(Rect::new(10.0, 10.0, 20.0, 20.0))).with_class(DRAGGABLE_CLASS));
        let session = DragSession::begin(&mut scene, Point::new(15.0, 12.0)).unwrap();
        session.drag_to(&mut scene, Point::new(55.0, 42.0));
        let Shape::Rect(rect) = &scene.elements[session.element()].shape else { panic!("rect") };
        assert_eq!((rect.x, rect.y), (50.0, 40.0));
    }

    #[test]
    fn non_draggable_is_ignored() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Element::new(Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0))));
        assert!(DragSession::begin(&mut scene, Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn dragged_element_is_raised() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(
            Element::new(Shape::Ellipse(Ellipse { cx: 50.0, cy: 50.0, rx: 10.0, ry: 5.0 }))
                .with_id("e")
                .with_class(DRAGGABLE_CLASS),
        );
        scene.push(Element::new(Shape::Rect(Rect::new(80.0, 80.0, 5.0, 5.0))));
        let session = DragSession::begin(&mut scene, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(session.element(), 1);
        assert_eq!(scene.elements[1].id.as_ref().map(|i| i.as_str()), Some("e"));
    }
}
