//! Style host seam
//!
//! The scheduler never touches a DOM directly. It reads and writes style
//! values through a [`StyleHost`], which owns the elements and hands out
//! copyable handles.

use crate::property::{parse_leading_number, Property, PropertyKind};
use crate::transform::TransformList;
use std::fmt::Debug;
use std::hash::Hash;

/// Something that stores per-element style values
pub trait StyleHost {
    /// Opaque element handle
    type Handle: Copy + Eq + Hash + Debug;

    /// Current (computed) value of a style, or `None` if the element or the
    /// style is absent.
    fn style(&self, target: Self::Handle, name: &str) -> Option<String>;

    /// Write a style value. Returns `false` when the element no longer exists.
    fn set_style(&mut self, target: Self::Handle, name: &str, value: &str) -> bool;
}

/// Read the current numeric value of `property` on `target`.
///
/// Missing and malformed values fall back to 0, or to the component's
/// identity value for transform components.
pub fn read_property<H: StyleHost + ?Sized>(host: &H, target: H::Handle, property: &Property) -> f32 {
    match property.kind() {
        PropertyKind::Transform(func) => host
            .style(target, "transform")
            .map(|raw| TransformList::parse(&raw))
            .unwrap_or_default()
            .value_or_identity(func),
        PropertyKind::Length | PropertyKind::Unitless => host
            .style(target, property.name())
            .and_then(|raw| parse_leading_number(&raw))
            .unwrap_or(0.0),
    }
}

/// Write a batch of property values to `target`.
///
/// Transform components are merged into the element's existing transform list
/// and written once. Returns `false` if the host reported the element gone.
pub fn write_properties<'a, H: StyleHost + ?Sized>(
    host: &mut H,
    target: H::Handle,
    values: impl IntoIterator<Item = (&'a Property, f32)>,
) -> bool {
    let mut transform: Option<TransformList> = None;
    let mut alive = true;

    for (property, value) in values {
        match property.kind() {
            PropertyKind::Transform(func) => {
                let list = transform.get_or_insert_with(|| {
                    host.style(target, "transform")
                        .map(|raw| TransformList::parse(&raw))
                        .unwrap_or_default()
                });
                list.set(func, value);
            }
            PropertyKind::Length | PropertyKind::Unitless => {
                alive &= host.set_style(target, property.name(), &property.format_value(value));
            }
        }
    }

    if let Some(list) = transform {
        alive &= host.set_style(target, "transform", &list.to_string());
    }

    alive
}

#[cfg(test)]
pub(crate) mod test_host {
    use super::StyleHost;
    use std::collections::{HashMap, HashSet};

    /// Minimal host keyed by `u32` element ids
    #[derive(Debug, Default)]
    pub struct TestHost {
        pub styles: HashMap<(u32, String), String>,
        pub removed: HashSet<u32>,
        pub writes: usize,
    }

    impl TestHost {
        pub fn with_style(mut self, el: u32, name: &str, value: &str) -> Self {
            self.styles.insert((el, name.to_string()), value.to_string());
            self
        }

        pub fn get(&self, el: u32, name: &str) -> Option<&str> {
            self.styles.get(&(el, name.to_string())).map(String::as_str)
        }
    }

    impl StyleHost for TestHost {
        type Handle = u32;

        fn style(&self, target: u32, name: &str) -> Option<String> {
            if self.removed.contains(&target) {
                return None;
            }
            self.styles.get(&(target, name.to_string())).cloned()
        }

        fn set_style(&mut self, target: u32, name: &str, value: &str) -> bool {
            if self.removed.contains(&target) {
                return false;
            }
            self.writes += 1;
            self.styles
                .insert((target, name.to_string()), value.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_host::TestHost;
    use super::*;

    #[test]
    fn test_read_property_defaults() {
        let host = TestHost::default()
            .with_style(1, "opacity", "0.4")
            .with_style(1, "width", "auto")
            .with_style(1, "transform", "scale(0.5)");

        assert_eq!(read_property(&host, 1, &Property::parse("opacity")), 0.4);
        assert_eq!(read_property(&host, 1, &Property::parse("width")), 0.0);
        assert_eq!(read_property(&host, 1, &Property::parse("height")), 0.0);
        assert_eq!(read_property(&host, 1, &Property::parse("scale")), 0.5);
        assert_eq!(read_property(&host, 1, &Property::parse("scaleX")), 1.0);
        assert_eq!(read_property(&host, 2, &Property::parse("rotateY")), 0.0);
    }

    #[test]
    fn test_write_properties_merges_transform() {
        let mut host = TestHost::default().with_style(1, "transform", "rotateY(90deg)");
        let translate = Property::parse("translateX");
        let opacity = Property::parse("opacity");

        assert!(write_properties(
            &mut host,
            1,
            [(&translate, 12.0), (&opacity, 0.5)]
        ));
        assert_eq!(host.get(1, "transform"), Some("rotateY(90deg) translateX(12px)"));
        assert_eq!(host.get(1, "opacity"), Some("0.5"));
    }

    #[test]
    fn test_write_to_removed_element_reports_gone() {
        let mut host = TestHost::default();
        host.removed.insert(7);
        let opacity = Property::parse("opacity");
        assert!(!write_properties(&mut host, 7, [(&opacity, 1.0)]));
        assert_eq!(host.writes, 0);
    }
}
