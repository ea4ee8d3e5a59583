//! Document seam
//!
//! Everything the dispatcher needs from a page: element lookup by attribute,
//! layout rectangles relative to the viewport, and text output for counters.

use reveal_animation::StyleHost;

/// Axis-aligned rectangle in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Move the rectangle by `(dx, dy)`
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping region, if the rectangles touch or overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// A page whose elements can be revealed
pub trait Document: StyleHost {
    /// Every live element carrying `attribute`, in document order
    fn elements_with_attribute(&self, attribute: &str) -> Vec<Self::Handle>;

    /// Attribute value, or `None` if the element or the attribute is absent
    fn attribute(&self, element: Self::Handle, name: &str) -> Option<String>;

    /// Border box relative to the viewport origin, or `None` if the element
    /// is gone or not laid out
    fn bounding_rect(&self, element: Self::Handle) -> Option<Rect>;

    /// Visible viewport, origin at (0, 0)
    fn viewport(&self) -> Rect;

    /// Replace an element's text. Returns `false` if the element is gone.
    fn set_text(&mut self, element: Self::Handle, text: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
    }

    #[test]
    fn test_intersection_disjoint_and_touching() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.intersection(&Rect::new(0.0, 150.0, 10.0, 10.0)), None);

        let edge = a.intersection(&Rect::new(0.0, 100.0, 10.0, 10.0)).unwrap();
        assert_eq!(edge.area(), 0.0);
    }
}
