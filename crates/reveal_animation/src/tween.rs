//! Tweens
//!
//! A tween interpolates one or more properties of a single target from the
//! values they had when the tween was created to requested end values.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::property::Property;
use crate::target::{read_property, write_properties, StyleHost};
use smallvec::SmallVec;
use std::fmt;

/// Callback run once when a tween finishes
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Options for starting a tween
pub struct TweenOptions {
    /// Duration in milliseconds (default 1000)
    pub duration_ms: f64,
    /// Delay before interpolation starts, in milliseconds (default 0)
    pub delay_ms: f64,
    /// Easing function (default ease-out)
    pub easing: Easing,
    /// Called exactly once after the final frame is written
    pub on_complete: Option<CompletionCallback>,
}

impl TweenOptions {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }

    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            delay_ms: 0.0,
            easing: Easing::EaseOut,
            on_complete: None,
        }
    }
}

impl fmt::Debug for TweenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenOptions")
            .field("duration_ms", &self.duration_ms)
            .field("delay_ms", &self.delay_ms)
            .field("easing", &self.easing)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// One interpolated property
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTrack {
    pub property: Property,
    pub from: f32,
    pub to: f32,
}

impl PropertyTrack {
    pub fn value_at(&self, eased: f32) -> f32 {
        self.from + (self.to - self.from) * eased
    }
}

/// Where a tween is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenPhase {
    /// Waiting for its start time
    Delayed,
    /// Interpolating
    Running,
    /// Final values written, callback consumed
    Finished,
}

/// Result of advancing a tween by one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenStep {
    /// Still in the delay phase, nothing written
    Pending,
    /// Values written, more frames needed
    Advanced,
    /// Final values written
    Completed,
}

/// An in-flight animation of one target
pub struct Tween<H> {
    target: H,
    tracks: SmallVec<[PropertyTrack; 2]>,
    duration_ms: f64,
    start_ms: f64,
    easing: Easing,
    on_complete: Option<CompletionCallback>,
    phase: TweenPhase,
    progress: f32,
}

impl<H: Copy + fmt::Debug> Tween<H> {
    /// Build a tween, capturing start values from `host`.
    ///
    /// `now_ms` is the current frame-clock time; interpolation begins at
    /// `now_ms + options.delay_ms`.
    pub fn capture<S>(
        host: &S,
        target: H,
        deltas: &[(&str, f32)],
        options: TweenOptions,
        now_ms: f64,
    ) -> Result<Self>
    where
        S: StyleHost<Handle = H> + ?Sized,
    {
        if !(options.duration_ms.is_finite() && options.duration_ms > 0.0) {
            return Err(AnimationError::InvalidDuration(options.duration_ms));
        }
        if deltas.is_empty() {
            return Err(AnimationError::EmptyProperties);
        }
        // Components are animated one by one; the composed list is not a number
        if let Some((name, _)) = deltas
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("transform"))
        {
            return Err(AnimationError::ComposedProperty(name.to_string()));
        }

        let tracks = deltas
            .iter()
            .map(|(name, to)| {
                let property = Property::parse(name);
                let from = read_property(host, target, &property);
                PropertyTrack {
                    property,
                    from,
                    to: *to,
                }
            })
            .collect();

        Ok(Self {
            target,
            tracks,
            duration_ms: options.duration_ms,
            start_ms: now_ms + options.delay_ms.max(0.0),
            easing: options.easing,
            on_complete: options.on_complete,
            phase: TweenPhase::Delayed,
            progress: 0.0,
        })
    }

    pub fn target(&self) -> H {
        self.target
    }

    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn phase(&self) -> TweenPhase {
        self.phase
    }

    /// Linear progress as of the last step (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Linear progress at `now_ms`, clamped to 0.0..=1.0
    pub fn progress_at(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Values every track would have at `now_ms`, without writing them
    pub fn sample(&self, now_ms: f64) -> SmallVec<[f32; 2]> {
        let eased = self.easing.apply(self.progress_at(now_ms));
        self.tracks.iter().map(|t| t.value_at(eased)).collect()
    }

    /// Advance to `now_ms` and write the interpolated values to `host`.
    ///
    /// Progress never moves backwards, even if `now_ms` does. Stepping a
    /// finished tween is a no-op that reports `Completed`.
    pub fn step<S>(&mut self, now_ms: f64, host: &mut S) -> TweenStep
    where
        S: StyleHost<Handle = H> + ?Sized,
    {
        if self.phase == TweenPhase::Finished {
            return TweenStep::Completed;
        }
        if now_ms < self.start_ms && self.phase == TweenPhase::Delayed {
            return TweenStep::Pending;
        }

        self.phase = TweenPhase::Running;
        self.progress = self.progress.max(self.progress_at(now_ms));
        let finished = self.progress >= 1.0;
        let eased = self.easing.apply(self.progress);

        // The last frame lands exactly on the end values
        let target = self.target;
        let alive = write_properties(
            host,
            target,
            self.tracks.iter().map(|t| {
                let value = if finished { t.to } else { t.value_at(eased) };
                (&t.property, value)
            }),
        );
        if !alive {
            tracing::trace!(element = ?target, "tween target missing, write skipped");
        }

        if finished {
            self.phase = TweenPhase::Finished;
            TweenStep::Completed
        } else {
            TweenStep::Advanced
        }
    }

    /// Take the completion callback. Returns `None` after the first call.
    pub fn take_callback(&mut self) -> Option<CompletionCallback> {
        self.on_complete.take()
    }
}

impl<H: fmt::Debug> fmt::Debug for Tween<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("tracks", &self.tracks)
            .field("duration_ms", &self.duration_ms)
            .field("start_ms", &self.start_ms)
            .field("easing", &self.easing)
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .finish()
    }
}
