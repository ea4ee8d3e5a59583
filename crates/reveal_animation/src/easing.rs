//! Easing functions for tweens

use crate::error::AnimationError;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing function type
///
/// Every variant maps progress `0.0` to `0.0` and `1.0` to `1.0`. `Spring` and
/// `Bounce` may leave the unit range strictly between those anchors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring,
    Bounce,
}

impl Easing {
    /// All named easings, in declaration order
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Spring,
        Easing::Bounce,
    ];

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Spring => spring_ease(t),
            Easing::Bounce => bounce_ease(t),
        }
    }

    /// Canonical camel-case name, as accepted by [`Easing::from_str`]
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "easeIn",
            Easing::EaseOut => "easeOut",
            Easing::EaseInOut => "easeInOut",
            Easing::Spring => "spring",
            Easing::Bounce => "bounce",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    /// Accepts `easeInOut` as well as `ease-in-out` and `ease_in_out`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "linear" => Ok(Easing::Linear),
            "easein" => Ok(Easing::EaseIn),
            "easeout" => Ok(Easing::EaseOut),
            "easeinout" => Ok(Easing::EaseInOut),
            "spring" => Ok(Easing::Spring),
            "bounce" => Ok(Easing::Bounce),
            _ => Err(AnimationError::UnknownEasing(s.to_string())),
        }
    }
}

/// Damped sine that overshoots and settles on 1.0.
///
/// Endpoints are special-cased so the curve anchors exactly at 0 and 1.
fn spring_ease(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let c4 = (2.0 * PI) / 3.0;
    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

/// Piecewise quadratic with four landings of decreasing height.
fn bounce_ease(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}
