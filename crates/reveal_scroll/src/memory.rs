//! In-memory document
//!
//! A headless page: elements with ids, attributes, inline styles, text and
//! fixed layout boxes, plus a vertically scrollable viewport.

use crate::document::{Document, Rect};
use indexmap::IndexMap;
use reveal_animation::StyleHost;

/// Handle into a [`MemoryDocument`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
struct MemoryElement {
    id: String,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: String,
    /// Layout box in page coordinates
    layout: Rect,
    removed: bool,
}

/// Headless document used by tests and the scenario runner
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    viewport_width: f32,
    viewport_height: f32,
    scroll_y: f32,
}

impl MemoryDocument {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            elements: Vec::new(),
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
        }
    }

    /// Add an element laid out at `layout` (page coordinates)
    pub fn add_element(&mut self, id: impl Into<String>, layout: Rect) -> ElementId {
        self.elements.push(MemoryElement {
            id: id.into(),
            layout,
            ..Default::default()
        });
        ElementId(self.elements.len() - 1)
    }

    /// Builder-style attribute setter
    pub fn with_attribute(&mut self, element: ElementId, name: &str, value: &str) -> &mut Self {
        self.set_attribute(element, name, value);
        self
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> bool {
        match self.live_mut(element) {
            Some(el) => {
                el.attributes.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// Look up a live element by its id
    pub fn find(&self, id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| !el.removed && el.id == id)
            .map(ElementId)
    }

    pub fn element_id(&self, element: ElementId) -> Option<&str> {
        self.live(element).map(|el| el.id.as_str())
    }

    pub fn text(&self, element: ElementId) -> Option<&str> {
        self.live(element).map(|el| el.text.as_str())
    }

    /// Inline style value, borrowed
    pub fn inline_style(&self, element: ElementId, name: &str) -> Option<&str> {
        self.live(element)
            .and_then(|el| el.styles.get(name))
            .map(String::as_str)
    }

    /// Detach an element. Later reads return nothing and writes are dropped.
    pub fn remove(&mut self, element: ElementId) -> bool {
        match self.live_mut(element) {
            Some(el) => {
                el.removed = true;
                true
            }
            None => false,
        }
    }

    /// Scroll so that page offset `y` sits at the top of the viewport
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Ids of live elements, in document order
    pub fn ids(&self) -> impl Iterator<Item = (ElementId, &str)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.removed)
            .map(|(i, el)| (ElementId(i), el.id.as_str()))
    }

    fn live(&self, element: ElementId) -> Option<&MemoryElement> {
        self.elements.get(element.0).filter(|el| !el.removed)
    }

    fn live_mut(&mut self, element: ElementId) -> Option<&mut MemoryElement> {
        self.elements.get_mut(element.0).filter(|el| !el.removed)
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl StyleHost for MemoryDocument {
    type Handle = ElementId;

    fn style(&self, target: ElementId, name: &str) -> Option<String> {
        self.inline_style(target, name).map(str::to_string)
    }

    fn set_style(&mut self, target: ElementId, name: &str, value: &str) -> bool {
        match self.live_mut(target) {
            Some(el) => {
                el.styles.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }
}

impl Document for MemoryDocument {
    fn elements_with_attribute(&self, attribute: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.removed && el.attributes.contains_key(attribute))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.live(element).and_then(|el| el.attributes.get(name).cloned())
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.live(element)
            .map(|el| el.layout.offset(0.0, -self.scroll_y))
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }

    fn set_text(&mut self, element: ElementId, text: &str) -> bool {
        match self.live_mut(element) {
            Some(el) => {
                el.text = text.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_moves_bounding_rect() {
        let mut doc = MemoryDocument::new(800.0, 600.0);
        let el = doc.add_element("card", Rect::new(0.0, 1000.0, 200.0, 100.0));

        assert_eq!(doc.bounding_rect(el).unwrap().y, 1000.0);
        doc.scroll_to(700.0);
        assert_eq!(doc.bounding_rect(el).unwrap().y, 300.0);
    }

    #[test]
    fn test_removed_element_is_inert() {
        let mut doc = MemoryDocument::default();
        let el = doc.add_element("gone", Rect::default());
        doc.with_attribute(el, "data-animation", "fade");
        doc.remove(el);

        assert!(!doc.set_style(el, "opacity", "1"));
        assert_eq!(doc.style(el, "opacity"), None);
        assert!(doc.elements_with_attribute("data-animation").is_empty());
        assert_eq!(doc.find("gone"), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut doc = MemoryDocument::default();
        let a = doc.add_element("a", Rect::default());
        let b = doc.add_element("b", Rect::default());
        doc.with_attribute(a, "data-animation", "slide")
            .with_attribute(a, "data-direction", "left")
            .with_attribute(b, "data-count", "42");

        assert_eq!(doc.elements_with_attribute("data-animation"), vec![a]);
        assert_eq!(doc.attribute(a, "data-direction").as_deref(), Some("left"));
        assert_eq!(doc.find("b"), Some(b));
    }
}
