//! Reveal Animation System
//!
//! Easing curves, per-frame tweens, and the scheduler that drives them.
//!
//! # Features
//!
//! - **Easing**: linear, quadratic in/out, spring and bounce curves
//! - **Tweens**: interpolate several style properties of one element at once
//! - **Composable transforms**: concurrent tweens each own a transform component
//! - **Timers**: one-shot and repeating delays, independent of frame ticks
//!
//! # Example
//!
//! ```rust
//! use reveal_animation::{Easing, ManualClock, FrameClock, StyleHost, TweenOptions, TweenScheduler};
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Styles(HashMap<(u32, String), String>);
//!
//! impl StyleHost for Styles {
//!     type Handle = u32;
//!     fn style(&self, el: u32, name: &str) -> Option<String> {
//!         self.0.get(&(el, name.to_string())).cloned()
//!     }
//!     fn set_style(&mut self, el: u32, name: &str, value: &str) -> bool {
//!         self.0.insert((el, name.to_string()), value.to_string());
//!         true
//!     }
//! }
//!
//! let clock = ManualClock::new();
//! let mut styles = Styles::default();
//! let mut scheduler = TweenScheduler::new();
//!
//! scheduler
//!     .start_tween(
//!         clock.now_ms(),
//!         &styles,
//!         1,
//!         &[("opacity", 1.0), ("translateY", 0.0)],
//!         TweenOptions::new(600.0).easing(Easing::EaseOut),
//!     )
//!     .unwrap();
//!
//! clock.advance(600.0);
//! scheduler.tick(clock.now_ms(), &mut styles);
//! assert_eq!(styles.style(1, "opacity").as_deref(), Some("1"));
//! assert!(!scheduler.has_active_tweens());
//! ```

pub mod clock;
pub mod easing;
pub mod error;
pub mod property;
pub mod scheduler;
pub mod target;
pub mod timer;
pub mod transform;
pub mod tween;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use property::{Property, PropertyKind, TransformFn};
pub use scheduler::{FrameReport, TweenId, TweenScheduler};
pub use target::{read_property, write_properties, StyleHost};
pub use timer::{TimerId, TimerQueue};
pub use transform::TransformList;
pub use tween::{CompletionCallback, PropertyTrack, Tween, TweenOptions, TweenPhase, TweenStep};
