//! Animation error types

use thiserror::Error;

/// Errors raised when a tween request is malformed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration must be positive and finite
    #[error("Invalid tween duration: {0}ms")]
    InvalidDuration(f64),

    /// A tween needs at least one property to animate
    #[error("Tween has no properties to animate")]
    EmptyProperties,

    /// The composed `transform` value cannot be interpolated as one number;
    /// animate its components (`translateY`, `scale`, ...) instead
    #[error("Cannot animate composed property '{0}', animate its components")]
    ComposedProperty(String),

    /// Easing name did not match any known easing
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
