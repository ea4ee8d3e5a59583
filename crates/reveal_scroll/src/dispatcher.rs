//! Visibility dispatcher
//!
//! Keeps the registry of elements waiting to be revealed. Each registration
//! fires at most once: the first intersecting observation turns it into a
//! [`Reveal`] and removes it from the registry for good.

use crate::config::AttributeNames;
use crate::counter::parse_count;
use crate::document::Document;
use crate::entry::AnimationKind;
use crate::intersection::IntersectionEntry;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// What to do when an element is first revealed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealAction {
    /// Entry animation to play
    pub entry: Option<AnimationKind>,
    /// Count-up target for the element's text
    pub count: Option<i64>,
}

impl RevealAction {
    pub fn entry(kind: AnimationKind) -> Self {
        Self {
            entry: Some(kind),
            count: None,
        }
    }

    pub fn count(target: i64) -> Self {
        Self {
            entry: None,
            count: Some(target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none() && self.count.is_none()
    }
}

/// Lifecycle of a registration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserveState {
    Unarmed,
    Fired,
}

/// A registered element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservedElement<H> {
    pub element: H,
    pub action: RevealAction,
    pub state: ObserveState,
}

/// An element that has just been revealed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reveal<H> {
    pub element: H,
    pub action: RevealAction,
}

/// One-shot reveal registry
#[derive(Debug)]
pub struct VisibilityDispatcher<H: Hash + Eq> {
    observed: IndexMap<H, ObservedElement<H>, FxBuildHasher>,
    fired: FxHashSet<H>,
}

impl<H: Copy + Eq + Hash + Debug> VisibilityDispatcher<H> {
    pub fn new() -> Self {
        Self {
            observed: IndexMap::default(),
            fired: FxHashSet::default(),
        }
    }

    /// Registry of entry animations declared in the document's markup
    pub fn scan_entries<D>(document: &D, attributes: &AttributeNames) -> Self
    where
        D: Document<Handle = H> + ?Sized,
    {
        let mut dispatcher = Self::new();

        for element in document.elements_with_attribute(&attributes.animation) {
            let Some(kind) = document.attribute(element, &attributes.animation) else {
                continue;
            };
            let direction = document.attribute(element, &attributes.direction);
            let kind = AnimationKind::from_attributes(&kind, direction.as_deref());
            dispatcher.merge(element, RevealAction::entry(kind));
        }

        tracing::debug!(registered = dispatcher.len(), "entry registry scanned");
        dispatcher
    }

    /// Registry of count-ups declared in the document's markup.
    ///
    /// Count-ups are watched by their own observer, so an element carrying
    /// both attributes is registered in both registries.
    pub fn scan_counts<D>(document: &D, attributes: &AttributeNames) -> Self
    where
        D: Document<Handle = H> + ?Sized,
    {
        let mut dispatcher = Self::new();

        for element in document.elements_with_attribute(&attributes.count) {
            let Some(raw) = document.attribute(element, &attributes.count) else {
                continue;
            };
            match parse_count(&raw) {
                Some(target) => dispatcher.merge(element, RevealAction::count(target)),
                None => tracing::warn!(element = ?element, value = %raw, "ignoring non-integer count"),
            }
        }

        tracing::debug!(registered = dispatcher.len(), "count registry scanned");
        dispatcher
    }

    fn merge(&mut self, element: H, action: RevealAction) {
        if self.fired.contains(&element) {
            return;
        }
        let slot = self.observed.entry(element).or_insert(ObservedElement {
            element,
            action: RevealAction::default(),
            state: ObserveState::Unarmed,
        });
        if action.entry.is_some() {
            slot.action.entry = action.entry;
        }
        if action.count.is_some() {
            slot.action.count = action.count;
        }
    }

    /// Register an element for an entry animation.
    ///
    /// Returns `false` if the element already fired; it will never be armed
    /// again.
    pub fn observe(&mut self, element: H, kind: AnimationKind) -> bool {
        if self.fired.contains(&element) {
            return false;
        }
        self.merge(element, RevealAction::entry(kind));
        tracing::debug!(element = ?element, kind = kind.name(), "observing element");
        true
    }

    /// Register an element for a count-up to `target`
    pub fn observe_count(&mut self, element: H, target: i64) -> bool {
        if self.fired.contains(&element) {
            return false;
        }
        self.merge(element, RevealAction::count(target));
        tracing::debug!(element = ?element, target, "observing count");
        true
    }

    /// Drop a registration without firing it
    pub fn unobserve(&mut self, element: H) -> bool {
        self.observed.shift_remove(&element).is_some()
    }

    /// Handle a batch of observations.
    ///
    /// Every intersecting entry for an unarmed element produces exactly one
    /// [`Reveal`]; the element is then deregistered. Non-intersecting
    /// entries and entries for unknown or already-fired elements are ignored.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry<H>]) -> Vec<Reveal<H>> {
        let mut revealed = Vec::new();

        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(mut observed) = self.observed.shift_remove(&entry.target) else {
                continue;
            };
            observed.state = ObserveState::Fired;
            self.fired.insert(observed.element);

            tracing::debug!(
                element = ?observed.element,
                kind = observed.action.entry.map(|k| k.name()),
                count = observed.action.count,
                ratio = entry.ratio,
                "element revealed"
            );
            revealed.push(Reveal {
                element: observed.element,
                action: observed.action,
            });
        }

        revealed
    }

    /// Registrations still waiting, in registration order
    pub fn pending(&self) -> impl Iterator<Item = &ObservedElement<H>> {
        self.observed.values()
    }

    pub fn pending_elements(&self) -> Vec<H> {
        self.observed.keys().copied().collect()
    }

    pub fn is_observed(&self, element: H) -> bool {
        self.observed.contains_key(&element)
    }

    pub fn has_fired(&self, element: H) -> bool {
        self.fired.contains(&element)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

impl<H: Copy + Eq + Hash + Debug> Default for VisibilityDispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SlideDirection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fires_at_most_once() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(1u32, AnimationKind::Fade);

        let first = dispatcher.on_intersection(&[IntersectionEntry::visible(1)]);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].action.entry, Some(AnimationKind::Fade));
        assert!(dispatcher.has_fired(1));
        assert!(!dispatcher.is_observed(1));

        let second = dispatcher.on_intersection(&[IntersectionEntry::visible(1)]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_fired_element_cannot_be_rearmed() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(1u32, AnimationKind::Flip);
        dispatcher.on_intersection(&[IntersectionEntry::visible(1)]);

        assert!(!dispatcher.observe(1, AnimationKind::Flip));
        assert!(dispatcher.on_intersection(&[IntersectionEntry::visible(1)]).is_empty());
    }

    #[test]
    fn test_hidden_entries_are_ignored() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(1u32, AnimationKind::Default);

        assert!(dispatcher.on_intersection(&[IntersectionEntry::hidden(1)]).is_empty());
        assert!(dispatcher.is_observed(1));
    }

    #[test]
    fn test_duplicate_entries_in_one_batch() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(1u32, AnimationKind::Default);

        let revealed = dispatcher.on_intersection(&[
            IntersectionEntry::visible(1),
            IntersectionEntry::visible(1),
        ]);
        assert_eq!(revealed.len(), 1);
    }

    #[test]
    fn test_unobserve() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(1u32, AnimationKind::Slide(SlideDirection::Left));
        assert!(dispatcher.unobserve(1));
        assert!(!dispatcher.unobserve(1));
        assert!(dispatcher.on_intersection(&[IntersectionEntry::visible(1)]).is_empty());
        assert!(!dispatcher.has_fired(1));
    }

    #[test]
    fn test_counts_scan_separately() {
        use crate::document::Rect;
        use crate::memory::MemoryDocument;

        let mut doc = MemoryDocument::default();
        let both = doc.add_element("both", Rect::default());
        doc.set_attribute(both, "data-animation", "fade");
        doc.set_attribute(both, "data-count", "1200+");
        let bad = doc.add_element("bad", Rect::default());
        doc.set_attribute(bad, "data-count", "lots");

        let attributes = AttributeNames::default();
        let entries = VisibilityDispatcher::scan_entries(&doc, &attributes);
        let counts = VisibilityDispatcher::scan_counts(&doc, &attributes);

        assert_eq!(entries.pending_elements(), vec![both]);
        assert_eq!(counts.pending_elements(), vec![both]);
        assert_eq!(
            entries.pending().next().map(|o| o.action),
            Some(RevealAction::entry(AnimationKind::Fade))
        );
        assert_eq!(
            counts.pending().next().map(|o| o.action),
            Some(RevealAction::count(1200))
        );
    }

    #[test]
    fn test_pending_keeps_registration_order() {
        let mut dispatcher = VisibilityDispatcher::new();
        dispatcher.observe(3u32, AnimationKind::Fade);
        dispatcher.observe(1u32, AnimationKind::Fade);
        dispatcher.observe(2u32, AnimationKind::Fade);
        dispatcher.on_intersection(&[IntersectionEntry::visible(1)]);

        assert_eq!(dispatcher.pending_elements(), vec![3, 2]);
    }
}
