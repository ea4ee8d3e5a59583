//! Count-up text
//!
//! Numbers that tick up from zero to their declared value the first time
//! they scroll into view.

use crate::document::Document;
use reveal_animation::Easing;
use std::fmt::Debug;

/// A running count-up on one element
#[derive(Clone, Debug, PartialEq)]
pub struct CountUp<H> {
    element: H,
    target: i64,
    start_ms: f64,
    duration_ms: f64,
    shown: Option<i64>,
}

impl<H: Copy + Debug> CountUp<H> {
    pub fn new(element: H, target: i64, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            element,
            target,
            start_ms,
            duration_ms: duration_ms.max(f64::MIN_POSITIVE),
            shown: None,
        }
    }

    pub fn element(&self) -> H {
        self.element
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Displayed value at `now_ms`: `floor(target * ease_out(progress))`
    pub fn value_at(&self, now_ms: f64) -> i64 {
        let progress = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        if progress >= 1.0 {
            return self.target;
        }
        let eased = Easing::EaseOut.apply(progress as f32) as f64;
        (self.target as f64 * eased).floor() as i64
    }

    /// Write the current value if it changed. Returns `true` once finished.
    pub fn step<D>(&mut self, now_ms: f64, document: &mut D) -> bool
    where
        D: Document<Handle = H> + ?Sized,
    {
        let value = self.value_at(now_ms);
        if self.shown != Some(value) {
            document.set_text(self.element, &value.to_string());
            self.shown = Some(value);
        }
        now_ms >= self.start_ms + self.duration_ms
    }
}

/// Parse a `data-count` value.
///
/// Reads the leading integer after optional whitespace and sign, so
/// `"1200+"` is 1200 and `"98%"` is 98. Values with no leading digit are
/// rejected.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.trim_start_matches(&['+', '-'][..]);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// All running count-ups
#[derive(Clone, Debug)]
pub struct Counters<H> {
    running: Vec<CountUp<H>>,
}

impl<H: Copy + Debug> Counters<H> {
    pub fn new() -> Self {
        Self {
            running: Vec::new(),
        }
    }

    pub fn start(&mut self, element: H, target: i64, now_ms: f64, duration_ms: f64) {
        tracing::debug!(element = ?element, target, "count-up started");
        self.running
            .push(CountUp::new(element, target, now_ms, duration_ms));
    }

    /// Advance every counter, dropping the finished ones
    pub fn tick<D>(&mut self, now_ms: f64, document: &mut D) -> usize
    where
        D: Document<Handle = H> + ?Sized,
    {
        self.running
            .retain_mut(|counter| !counter.step(now_ms, &mut *document));
        self.running.len()
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

impl<H: Copy + Debug> Default for Counters<H> {
    fn default() -> Self {
        Self::new()
    }
}
