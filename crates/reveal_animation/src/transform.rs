//! Composable transform lists
//!
//! A `transform` style such as `translateX(30px) rotateY(90deg)` is kept as an
//! ordered list of components so that several tweens can each drive their own
//! component without clobbering the others.

use crate::property::{format_component, parse_leading_number, TransformFn};
use smallvec::SmallVec;
use std::fmt;

/// Ordered transform components
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformList {
    components: SmallVec<[(TransformFn, f32); 4]>,
}

impl TransformList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a transform string.
    ///
    /// Unknown functions and malformed arguments are skipped; `none` and the
    /// empty string yield an empty list. Unitless zero (`translateX(0)`) is
    /// accepted.
    pub fn parse(raw: &str) -> Self {
        let mut list = Self::new();
        let mut rest = raw.trim();

        while let Some(open) = rest.find('(') {
            let Some(close_rel) = rest[open..].find(')') else {
                break;
            };
            let close = open + close_rel;
            let name = rest[..open].trim();
            let arg = &rest[open + 1..close];

            match (TransformFn::from_name(name), parse_leading_number(arg)) {
                (Some(func), Some(value)) => list.set(func, value),
                _ => tracing::trace!(name, arg, "skipping transform component"),
            }

            rest = rest[close + 1..].trim_start();
        }

        list
    }

    /// Value of a component, if present
    pub fn get(&self, func: TransformFn) -> Option<f32> {
        self.components
            .iter()
            .find(|(f, _)| *f == func)
            .map(|(_, v)| *v)
    }

    /// Value of a component, falling back to its identity value
    pub fn value_or_identity(&self, func: TransformFn) -> f32 {
        self.get(func).unwrap_or_else(|| func.identity())
    }

    /// Replace a component in place, or append it
    pub fn set(&mut self, func: TransformFn, value: f32) {
        match self.components.iter_mut().find(|(f, _)| *f == func) {
            Some(slot) => slot.1 = value,
            None => self.components.push((func, value)),
        }
    }

    pub fn remove(&mut self, func: TransformFn) -> Option<f32> {
        let index = self.components.iter().position(|(f, _)| *f == func)?;
        Some(self.components.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformFn, f32)> + '_ {
        self.components.iter().copied()
    }
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("none");
        }
        for (i, (func, value)) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&format_component(*func, *value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_multiple_components() {
        let list = TransformList::parse("translateX(30px) rotateY(90deg) scale(0.9)");
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(TransformFn::TranslateX), Some(30.0));
        assert_eq!(list.get(TransformFn::RotateY), Some(90.0));
        assert_eq!(list.get(TransformFn::Scale), Some(0.9));
    }

    #[test]
    fn test_parse_unitless_zero_and_none() {
        assert_eq!(
            TransformList::parse("translateY(0)").get(TransformFn::TranslateY),
            Some(0.0)
        );
        assert!(TransformList::parse("none").is_empty());
        assert!(TransformList::parse("").is_empty());
    }

    #[test]
    fn test_parse_skips_unknown_functions() {
        let list = TransformList::parse("matrix(1, 0, 0, 1, 0, 0) translateY(-30px)");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(TransformFn::TranslateY), Some(-30.0));
    }

    #[test]
    fn test_set_composes_components() {
        let mut list = TransformList::parse("translateY(20px)");
        list.set(TransformFn::RotateY, 45.0);
        list.set(TransformFn::TranslateY, 10.0);
        assert_eq!(list.to_string(), "translateY(10px) rotateY(45deg)");
    }

    #[test]
    fn test_identity_fallback() {
        let list = TransformList::new();
        assert_eq!(list.value_or_identity(TransformFn::Scale), 1.0);
        assert_eq!(list.value_or_identity(TransformFn::TranslateX), 0.0);
        assert_eq!(list.to_string(), "none");
    }
}
