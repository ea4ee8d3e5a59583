//! Entry animation presets
//!
//! Each declared animation kind maps to an [`EntryPlan`]: the state written
//! the moment the element is revealed, and the tween that follows the
//! stagger delay.

use reveal_animation::{write_properties, Easing, Property, StyleHost, TweenOptions};
use smallvec::{smallvec, SmallVec};

/// Offset used by slide entries, in pixels
pub const SLIDE_DISTANCE: f32 = 30.0;

/// Offset used by the default entry, in pixels
pub const RISE_DISTANCE: f32 = 20.0;

/// Starting rotation of flip entries, in degrees
pub const FLIP_ANGLE: f32 = 90.0;

/// Direction a slide entry travels from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlideDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl SlideDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Some(SlideDirection::Up),
            "down" => Some(SlideDirection::Down),
            "left" => Some(SlideDirection::Left),
            "right" => Some(SlideDirection::Right),
            _ => None,
        }
    }

    /// Transform component and signed starting offset
    fn offset(&self) -> (&'static str, f32) {
        match self {
            SlideDirection::Up => ("translateY", SLIDE_DISTANCE),
            SlideDirection::Down => ("translateY", -SLIDE_DISTANCE),
            SlideDirection::Left => ("translateX", SLIDE_DISTANCE),
            SlideDirection::Right => ("translateX", -SLIDE_DISTANCE),
        }
    }
}

/// Declared entry animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Flip,
    Slide(SlideDirection),
    Fade,
    /// Rise-and-fade, also used for unrecognised kinds
    #[default]
    Default,
}

impl AnimationKind {
    /// Classify markup attributes.
    ///
    /// Unknown kinds fall back to [`AnimationKind::Default`]; a missing or
    /// unknown slide direction falls back to [`SlideDirection::Up`].
    pub fn from_attributes(kind: &str, direction: Option<&str>) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "flip" => AnimationKind::Flip,
            "fade" => AnimationKind::Fade,
            "slide" => {
                let parsed = direction.and_then(SlideDirection::parse);
                if parsed.is_none() {
                    if let Some(raw) = direction {
                        tracing::warn!(direction = raw, "unknown slide direction, sliding up");
                    }
                }
                AnimationKind::Slide(parsed.unwrap_or_default())
            }
            _ => AnimationKind::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::Flip => "flip",
            AnimationKind::Slide(_) => "slide",
            AnimationKind::Fade => "fade",
            AnimationKind::Default => "default",
        }
    }

    /// Build the entry plan for this kind
    pub fn plan(&self) -> EntryPlan {
        match self {
            AnimationKind::Flip => EntryPlan {
                from: smallvec![("rotateY", FLIP_ANGLE), ("opacity", 0.0)],
                to: smallvec![("rotateY", 0.0), ("opacity", 1.0)],
                duration_ms: 600.0,
                easing: Easing::Spring,
            },
            AnimationKind::Slide(direction) => {
                let (axis, offset) = direction.offset();
                EntryPlan {
                    from: smallvec![(axis, offset), ("opacity", 0.0)],
                    to: smallvec![(axis, 0.0), ("opacity", 1.0)],
                    duration_ms: 800.0,
                    easing: Easing::EaseOut,
                }
            }
            AnimationKind::Fade => EntryPlan {
                from: smallvec![("opacity", 0.0)],
                to: smallvec![("opacity", 1.0)],
                duration_ms: 1000.0,
                easing: Easing::EaseOut,
            },
            AnimationKind::Default => EntryPlan {
                from: smallvec![("opacity", 0.0), ("translateY", RISE_DISTANCE)],
                to: smallvec![("opacity", 1.0), ("translateY", 0.0)],
                duration_ms: 600.0,
                easing: Easing::EaseOut,
            },
        }
    }
}

/// Initial state plus the tween that animates out of it
#[derive(Clone, Debug, PartialEq)]
pub struct EntryPlan {
    pub from: SmallVec<[(&'static str, f32); 2]>,
    pub to: SmallVec<[(&'static str, f32); 2]>,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl EntryPlan {
    /// Write the initial state. Returns `false` if the element is gone.
    pub fn apply_initial<S: StyleHost + ?Sized>(&self, host: &mut S, element: S::Handle) -> bool {
        let properties: SmallVec<[(Property, f32); 2]> = self
            .from
            .iter()
            .map(|(name, value)| (Property::parse(name), *value))
            .collect();
        write_properties(host, element, properties.iter().map(|(p, v)| (p, *v)))
    }

    /// Tween options for the follow-up animation
    pub fn options(&self) -> TweenOptions {
        TweenOptions::new(self.duration_ms).easing(self.easing)
    }

    /// End values for the follow-up animation
    pub fn deltas(&self) -> &[(&'static str, f32)] {
        &self.to
    }
}
