//! Tween scheduler
//!
//! Owns every in-flight tween and advances them once per frame.

use crate::error::Result;
use crate::target::StyleHost;
use crate::tween::{CompletionCallback, Tween, TweenOptions, TweenStep};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct TweenId;
}

/// Outcome of a single scheduler frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Tweens that wrote values this frame
    pub advanced: usize,
    /// Tweens still waiting out their delay
    pub pending: usize,
    /// Tweens that finished this frame
    pub completed: usize,
}

/// The scheduler that ticks all active tweens
pub struct TweenScheduler<H> {
    tweens: SlotMap<TweenId, Tween<H>>,
    /// Insertion order, so same-property collisions resolve predictably
    order: Vec<TweenId>,
}

impl<H: Copy + std::fmt::Debug> TweenScheduler<H> {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Start a tween on `target`.
    ///
    /// Start values are read from `host` now; interpolation begins at
    /// `now_ms + options.delay_ms`.
    pub fn start_tween<S>(
        &mut self,
        now_ms: f64,
        host: &S,
        target: H,
        deltas: &[(&str, f32)],
        options: TweenOptions,
    ) -> Result<TweenId>
    where
        S: StyleHost<Handle = H> + ?Sized,
    {
        let tween = Tween::capture(host, target, deltas, options, now_ms)?;
        Ok(self.insert(tween))
    }

    /// Add an already-built tween
    pub fn insert(&mut self, tween: Tween<H>) -> TweenId {
        tracing::debug!(
            element = ?tween.target(),
            tracks = tween.tracks().len(),
            duration_ms = tween.duration_ms(),
            start_ms = tween.start_ms(),
            easing = %tween.easing(),
            "tween started"
        );
        let id = self.tweens.insert(tween);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween<H>> {
        self.tweens.get(id)
    }

    /// Drop an in-flight tween without running its completion callback
    pub fn cancel(&mut self, id: TweenId) -> bool {
        match self.tweens.remove(id) {
            Some(tween) => {
                self.order.retain(|other| *other != id);
                tracing::debug!(element = ?tween.target(), "tween cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every tween on `target`. Returns how many were dropped.
    pub fn cancel_target(&mut self, target: H) -> usize
    where
        H: PartialEq,
    {
        let ids: SmallVec<[TweenId; 4]> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.tweens.get(*id).is_some_and(|t| t.target() == target))
            .collect();
        ids.iter().filter(|id| self.cancel(**id)).count()
    }

    /// Tick all tweens at frame time `now_ms`.
    ///
    /// Finished tweens are removed before their callbacks run, so a callback
    /// never observes its own tween as active.
    pub fn tick<S>(&mut self, now_ms: f64, host: &mut S) -> FrameReport
    where
        S: StyleHost<Handle = H> + ?Sized,
    {
        let mut report = FrameReport::default();
        let mut callbacks: SmallVec<[CompletionCallback; 4]> = SmallVec::new();
        let mut finished: SmallVec<[TweenId; 4]> = SmallVec::new();

        for id in &self.order {
            let Some(tween) = self.tweens.get_mut(*id) else {
                continue;
            };
            match tween.step(now_ms, &mut *host) {
                TweenStep::Pending => report.pending += 1,
                TweenStep::Advanced => report.advanced += 1,
                TweenStep::Completed => {
                    report.completed += 1;
                    finished.push(*id);
                }
            }
        }

        for id in finished {
            if let Some(mut tween) = self.tweens.remove(id) {
                tracing::debug!(element = ?tween.target(), "tween finished");
                if let Some(callback) = tween.take_callback() {
                    callbacks.push(callback);
                }
            }
        }
        if report.completed > 0 {
            let tweens = &self.tweens;
            self.order.retain(|id| tweens.contains_key(*id));
        }

        for callback in callbacks {
            callback();
        }

        tracing::trace!(
            advanced = report.advanced,
            pending = report.pending,
            completed = report.completed,
            "scheduler frame"
        );
        report
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    /// Check if any tweens are still in flight
    pub fn has_active_tweens(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Get the number of tweens in the scheduler
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Iterate over active tweens in start order
    pub fn iter(&self) -> impl Iterator<Item = (TweenId, &Tween<H>)> {
        self.order
            .iter()
            .filter_map(|id| self.tweens.get(*id).map(|t| (*id, t)))
    }
}

impl<H: Copy + std::fmt::Debug> Default for TweenScheduler<H> {
    fn default() -> Self {
        Self::new()
    }
}
