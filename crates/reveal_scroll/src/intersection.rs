//! Viewport intersection
//!
//! Geometry used when the engine polls layout itself instead of receiving
//! callbacks from a native observer.

use crate::config::RevealConfig;
use crate::document::{Document, Rect};

/// Observer geometry settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Minimum visible fraction (0.0 to 1.0)
    pub threshold: f32,
    /// Pixels removed from the bottom edge of the viewport
    pub bottom_inset: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_inset: 50.0,
        }
    }
}

impl From<&RevealConfig> for ObserverOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_inset: config.root_margin_bottom,
        }
    }
}

impl ObserverOptions {
    /// Observer used for count-up text
    pub fn for_counts(config: &RevealConfig) -> Self {
        Self {
            threshold: config.count_threshold,
            bottom_inset: config.count_root_margin_bottom,
        }
    }

    /// Effective root rectangle for `viewport`
    pub fn root(&self, viewport: Rect) -> Rect {
        Rect::new(
            viewport.x,
            viewport.y,
            viewport.width,
            (viewport.height - self.bottom_inset).max(0.0),
        )
    }

    /// Visible fraction of `rect` inside the effective root.
    ///
    /// A zero-area element counts as fully visible when it lies inside the
    /// root, and invisible otherwise.
    pub fn ratio(&self, rect: Rect, viewport: Rect) -> f32 {
        let Some(overlap) = rect.intersection(&self.root(viewport)) else {
            return 0.0;
        };
        let area = rect.area();
        if area <= 0.0 {
            return 1.0;
        }
        (overlap.area() / area).clamp(0.0, 1.0)
    }

    /// Whether a visible fraction counts as "entered"
    pub fn crosses(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// One observation of one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry<H> {
    pub target: H,
    pub ratio: f32,
    pub is_intersecting: bool,
}

impl<H> IntersectionEntry<H> {
    /// Entry reported by a host observer that only knows "visible or not"
    pub fn visible(target: H) -> Self {
        Self {
            target,
            ratio: 1.0,
            is_intersecting: true,
        }
    }

    pub fn hidden(target: H) -> Self {
        Self {
            target,
            ratio: 0.0,
            is_intersecting: false,
        }
    }
}

/// Measure `targets` against the document's viewport.
///
/// Elements without a layout box are reported as not intersecting.
pub fn measure<D: Document>(
    document: &D,
    targets: impl IntoIterator<Item = D::Handle>,
    options: &ObserverOptions,
) -> Vec<IntersectionEntry<D::Handle>> {
    let viewport = document.viewport();
    targets
        .into_iter()
        .map(|target| match document.bounding_rect(target) {
            Some(rect) => {
                let ratio = options.ratio(rect, viewport);
                IntersectionEntry {
                    target,
                    ratio,
                    is_intersecting: options.crosses(ratio),
                }
            }
            None => IntersectionEntry::hidden(target),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    #[test]
    fn test_bottom_inset_shrinks_root() {
        let options = ObserverOptions::default();
        assert_eq!(options.root(VIEWPORT).height, 750.0);

        // Sits entirely inside the trimmed band at the bottom
        let rect = Rect::new(0.0, 760.0, 100.0, 40.0);
        assert_eq!(options.ratio(rect, VIEWPORT), 0.0);
        assert!(!options.crosses(options.ratio(rect, VIEWPORT)));
    }

    #[test]
    fn test_threshold() {
        let options = ObserverOptions::default();
        // 5% visible: 10px of 200px above the trimmed edge
        let barely = Rect::new(0.0, 740.0, 100.0, 200.0);
        assert!((options.ratio(barely, VIEWPORT) - 0.05).abs() < 1e-6);
        assert!(!options.crosses(options.ratio(barely, VIEWPORT)));

        // 15% visible
        let enough = Rect::new(0.0, 720.0, 100.0, 200.0);
        assert!(options.crosses(options.ratio(enough, VIEWPORT)));
    }

    #[test]
    fn test_count_observer_fires_on_first_pixel() {
        let options = ObserverOptions::for_counts(&RevealConfig::default());
        assert_eq!(options.root(VIEWPORT).height, 800.0);

        let near_fold = Rect::new(0.0, 760.0, 100.0, 80.0);
        assert!(options.crosses(options.ratio(near_fold, VIEWPORT)));
        let entries = ObserverOptions::default();
        assert!(!entries.crosses(entries.ratio(near_fold, VIEWPORT)));

        let below = Rect::new(0.0, 800.0, 100.0, 80.0);
        assert!(!options.crosses(options.ratio(below, VIEWPORT)));
    }

    #[test]
    fn test_zero_area_elements() {
        let options = ObserverOptions::default();
        assert_eq!(options.ratio(Rect::new(10.0, 10.0, 0.0, 0.0), VIEWPORT), 1.0);
        assert_eq!(options.ratio(Rect::new(10.0, 900.0, 0.0, 0.0), VIEWPORT), 0.0);
    }

    #[test]
    fn test_above_viewport() {
        let options = ObserverOptions::default();
        let scrolled_past = Rect::new(0.0, -300.0, 100.0, 200.0);
        assert_eq!(options.ratio(scrolled_past, VIEWPORT), 0.0);
    }
}
