//! Animatable properties
//!
//! Property names are resolved once, when a tween is created, into a
//! [`Property`] that knows how its value is read back and written out.

use std::fmt;

/// A single transform function that can be animated independently
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformFn {
    TranslateX,
    TranslateY,
    TranslateZ,
    Scale,
    ScaleX,
    ScaleY,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
}

impl TransformFn {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "translateX" => TransformFn::TranslateX,
            "translateY" => TransformFn::TranslateY,
            "translateZ" => TransformFn::TranslateZ,
            "scale" => TransformFn::Scale,
            "scaleX" => TransformFn::ScaleX,
            "scaleY" => TransformFn::ScaleY,
            "rotate" => TransformFn::Rotate,
            "rotateX" => TransformFn::RotateX,
            "rotateY" => TransformFn::RotateY,
            "rotateZ" => TransformFn::RotateZ,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformFn::TranslateX => "translateX",
            TransformFn::TranslateY => "translateY",
            TransformFn::TranslateZ => "translateZ",
            TransformFn::Scale => "scale",
            TransformFn::ScaleX => "scaleX",
            TransformFn::ScaleY => "scaleY",
            TransformFn::Rotate => "rotate",
            TransformFn::RotateX => "rotateX",
            TransformFn::RotateY => "rotateY",
            TransformFn::RotateZ => "rotateZ",
        }
    }

    /// Unit suffix used when serializing this component
    pub fn unit(&self) -> &'static str {
        match self {
            TransformFn::TranslateX | TransformFn::TranslateY | TransformFn::TranslateZ => "px",
            TransformFn::Scale | TransformFn::ScaleX | TransformFn::ScaleY => "",
            TransformFn::Rotate
            | TransformFn::RotateX
            | TransformFn::RotateY
            | TransformFn::RotateZ => "deg",
        }
    }

    /// Value of this component when it is absent from a transform list
    pub fn identity(&self) -> f32 {
        match self {
            TransformFn::Scale | TransformFn::ScaleX | TransformFn::ScaleY => 1.0,
            _ => 0.0,
        }
    }
}

/// How a property is stored on the element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// One component of the element's `transform` style
    Transform(TransformFn),
    /// Plain style value with a `px` suffix
    Length,
    /// Plain style value without a unit (opacity and friends)
    Unitless,
}

/// A resolved animatable property
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Property {
    name: String,
    kind: PropertyKind,
}

impl Property {
    /// Resolve a property name.
    ///
    /// Transform function names (`translateX`, `rotateY`, `scale`, ...) become
    /// transform components, anything containing `opacity` is unit-less, and
    /// every other name is treated as a pixel length.
    pub fn parse(name: &str) -> Self {
        let kind = if let Some(func) = TransformFn::from_name(name) {
            PropertyKind::Transform(func)
        } else if name.to_ascii_lowercase().contains("opacity") {
            PropertyKind::Unitless
        } else {
            PropertyKind::Length
        };

        Self {
            name: name.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Style name this property is written under
    pub fn style_name(&self) -> &str {
        match self.kind {
            PropertyKind::Transform(_) => "transform",
            _ => &self.name,
        }
    }

    /// Format a plain (non-transform) value with its unit
    pub fn format_value(&self, value: f32) -> String {
        match self.kind {
            PropertyKind::Transform(func) => format_component(func, value),
            PropertyKind::Length => format!("{}px", format_number(value)),
            PropertyKind::Unitless => format_number(value),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        Property::parse(name)
    }
}

/// Read a leading float the way style values are read (`"12.5px"` -> 12.5).
///
/// Returns `None` when the string has no numeric prefix.
pub fn parse_leading_number(raw: &str) -> Option<f32> {
    let raw = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, c) in raw.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '+' | '-' if seen_exp && raw[..i].ends_with(['e', 'E']) => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    let mut candidate = &raw[..end];
    // Trailing exponent marker without digits ("3e", "3e-") is not part of the number
    while candidate.ends_with(['e', 'E', '+', '-']) {
        candidate = &candidate[..candidate.len() - 1];
    }
    if !seen_digit {
        return None;
    }
    candidate.parse::<f32>().ok().filter(|v| v.is_finite())
}

pub(crate) fn format_component(func: TransformFn, value: f32) -> String {
    format!("{}({}{})", func.name(), format_number(value), func.unit())
}

/// Compact number formatting: no trailing zeros, no `-0`.
pub(crate) fn format_number(value: f32) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let mut text = format!("{rounded:.4}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}
