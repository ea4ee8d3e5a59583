//! Reveal engine
//!
//! One engine per page session. It owns the document, the frame clock, the
//! tween scheduler, the timer queue, the reveal registry and the running
//! count-ups, and advances all of them from a single [`RevealEngine::frame`]
//! call per display refresh.

use crate::config::{ConfigError, RevealConfig};
use crate::counter::Counters;
use crate::dispatcher::{Reveal, VisibilityDispatcher};
use crate::document::Document;
use crate::entry::{AnimationKind, EntryPlan};
use crate::intersection::{measure, IntersectionEntry, ObserverOptions};
use reveal_animation::{
    FrameClock, FrameReport, Result as AnimationResult, TimerId, TimerQueue, TweenId,
    TweenOptions, TweenScheduler,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared callback for user timers
pub type TimerCallback<D, C> = Rc<RefCell<dyn FnMut(&mut TimerContext<'_, D, C>)>>;

/// Work to run after a tween finishes
type Continuation<D, C> = Box<dyn FnOnce(&mut TimerContext<'_, D, C>)>;

/// Work carried by the timer queue
pub enum TimerTask<D: Document, C: FrameClock> {
    /// Start an entry tween once the stagger delay has passed
    Entry { element: D::Handle, plan: EntryPlan },
    /// Run a host callback
    Callback(TimerCallback<D, C>),
}

impl<D: Document, C: FrameClock> Clone for TimerTask<D, C> {
    fn clone(&self) -> Self {
        match self {
            TimerTask::Entry { element, plan } => TimerTask::Entry {
                element: *element,
                plan: plan.clone(),
            },
            TimerTask::Callback(callback) => TimerTask::Callback(Rc::clone(callback)),
        }
    }
}

impl<D: Document, C: FrameClock> fmt::Debug for TimerTask<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerTask::Entry { element, plan } => f
                .debug_struct("Entry")
                .field("element", element)
                .field("plan", plan)
                .finish(),
            TimerTask::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Engine access handed to timer callbacks and tween continuations.
///
/// Callbacks run inside [`RevealEngine::frame`], so anything started here is
/// timed from the current frame.
pub struct TimerContext<'a, D: Document, C: FrameClock> {
    engine: &'a mut RevealEngine<D, C>,
}

impl<'a, D: Document, C: FrameClock> TimerContext<'a, D, C> {
    pub fn now_ms(&self) -> f64 {
        self.engine.now_ms()
    }

    pub fn animate(
        &mut self,
        target: D::Handle,
        deltas: &[(&str, f32)],
        options: TweenOptions,
    ) -> AnimationResult<TweenId> {
        self.engine.animate(target, deltas, options)
    }

    /// See [`RevealEngine::animate_then`]
    pub fn animate_then(
        &mut self,
        target: D::Handle,
        deltas: &[(&str, f32)],
        options: TweenOptions,
        then: impl FnOnce(&mut TimerContext<'_, D, C>) + 'static,
    ) -> AnimationResult<TweenId>
    where
        D: 'static,
        C: 'static,
    {
        self.engine.animate_then(target, deltas, options, then)
    }

    pub fn cancel(&mut self, id: TweenId) -> bool {
        self.engine.cancel(id)
    }

    pub fn set_timeout(
        &mut self,
        delay_ms: f64,
        callback: impl FnMut(&mut TimerContext<'_, D, C>) + 'static,
    ) -> TimerId {
        self.engine.set_timeout(delay_ms, callback)
    }

    pub fn set_interval(
        &mut self,
        interval_ms: f64,
        callback: impl FnMut(&mut TimerContext<'_, D, C>) + 'static,
    ) -> TimerId {
        self.engine.set_interval(interval_ms, callback)
    }

    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.engine.clear_timer(id)
    }

    pub fn document(&self) -> &D {
        self.engine.document()
    }

    pub fn document_mut(&mut self) -> &mut D {
        self.engine.document_mut()
    }
}

/// What happened during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Timers that fired
    pub timers_fired: usize,
    /// Elements revealed by polling
    pub revealed: usize,
    /// Tween scheduler activity
    pub tweens: FrameReport,
    /// Count-ups still running after this frame
    pub counters_running: usize,
}

/// The per-page animation service
pub struct RevealEngine<D: Document, C: FrameClock> {
    document: D,
    clock: C,
    config: RevealConfig,
    observer: ObserverOptions,
    count_observer: ObserverOptions,
    scheduler: TweenScheduler<D::Handle>,
    timers: TimerQueue<TimerTask<D, C>>,
    completions: Rc<RefCell<Vec<Continuation<D, C>>>>,
    dispatcher: VisibilityDispatcher<D::Handle>,
    count_dispatcher: VisibilityDispatcher<D::Handle>,
    counters: Counters<D::Handle>,
    frames: u64,
}

impl<D: Document, C: FrameClock> RevealEngine<D, C> {
    /// Validate `config` and scan `document` for revealable elements
    pub fn new(document: D, clock: C, config: RevealConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(document, clock, config))
    }

    /// Engine with the default configuration
    pub fn with_defaults(document: D, clock: C) -> Self {
        Self::build(document, clock, RevealConfig::default())
    }

    fn build(document: D, clock: C, config: RevealConfig) -> Self {
        let dispatcher = VisibilityDispatcher::scan_entries(&document, &config.attributes);
        let count_dispatcher = VisibilityDispatcher::scan_counts(&document, &config.attributes);
        let observer = ObserverOptions::from(&config);
        let count_observer = ObserverOptions::for_counts(&config);

        Self {
            document,
            clock,
            config,
            observer,
            count_observer,
            scheduler: TweenScheduler::new(),
            timers: TimerQueue::new(),
            completions: Rc::new(RefCell::new(Vec::new())),
            dispatcher,
            count_dispatcher,
            counters: Counters::new(),
            frames: 0,
        }
    }

    /// Animate numeric properties of `target` toward `deltas`.
    ///
    /// Start values are read now; the tween is advanced by [`Self::frame`].
    pub fn animate(
        &mut self,
        target: D::Handle,
        deltas: &[(&str, f32)],
        options: TweenOptions,
    ) -> AnimationResult<TweenId> {
        let now = self.clock.now_ms();
        self.scheduler
            .start_tween(now, &self.document, target, deltas, options)
    }

    /// Like [`Self::animate`], then run `then` with engine access in the
    /// frame the tween finishes.
    ///
    /// `then` runs after the tween's own `on_complete`. A cancelled tween
    /// runs neither.
    pub fn animate_then(
        &mut self,
        target: D::Handle,
        deltas: &[(&str, f32)],
        mut options: TweenOptions,
        then: impl FnOnce(&mut TimerContext<'_, D, C>) + 'static,
    ) -> AnimationResult<TweenId>
    where
        D: 'static,
        C: 'static,
    {
        let queue = Rc::clone(&self.completions);
        let previous = options.on_complete.take();
        let options = options.on_complete(move || {
            if let Some(callback) = previous {
                callback();
            }
            queue.borrow_mut().push(Box::new(then));
        });
        self.animate(target, deltas, options)
    }

    /// Stop an in-flight tween without running its completion callback
    pub fn cancel(&mut self, id: TweenId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Register an element for an entry animation after startup
    pub fn observe(&mut self, element: D::Handle, kind: AnimationKind) -> bool {
        self.dispatcher.observe(element, kind)
    }

    /// Register an element for a count-up after startup
    pub fn observe_count(&mut self, element: D::Handle, target: i64) -> bool {
        self.count_dispatcher.observe_count(element, target)
    }

    /// Stop watching an element without revealing it
    pub fn unobserve(&mut self, element: D::Handle) -> bool {
        let entry = self.dispatcher.unobserve(element);
        let count = self.count_dispatcher.unobserve(element);
        entry || count
    }

    /// Run `callback` once, `delay_ms` from now
    pub fn set_timeout(
        &mut self,
        delay_ms: f64,
        callback: impl FnMut(&mut TimerContext<'_, D, C>) + 'static,
    ) -> TimerId {
        let now = self.clock.now_ms();
        self.timers
            .once(now, delay_ms, TimerTask::Callback(Rc::new(RefCell::new(callback))))
    }

    /// Run `callback` every `interval_ms`
    pub fn set_interval(
        &mut self,
        interval_ms: f64,
        callback: impl FnMut(&mut TimerContext<'_, D, C>) + 'static,
    ) -> TimerId {
        let now = self.clock.now_ms();
        self.timers.repeating(
            now,
            interval_ms,
            TimerTask::Callback(Rc::new(RefCell::new(callback))),
        )
    }

    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Feed observations from the host's entry observer.
    ///
    /// Returns how many elements were revealed.
    pub fn notify_intersections(&mut self, entries: &[IntersectionEntry<D::Handle>]) -> usize {
        let reveals = self.dispatcher.on_intersection(entries);
        self.begin_reveals(reveals)
    }

    /// Feed observations from the host's count-up observer
    pub fn notify_count_intersections(
        &mut self,
        entries: &[IntersectionEntry<D::Handle>],
    ) -> usize {
        let reveals = self.count_dispatcher.on_intersection(entries);
        self.begin_reveals(reveals)
    }

    fn begin_reveals(&mut self, reveals: Vec<Reveal<D::Handle>>) -> usize {
        let now = self.clock.now_ms();
        let count = reveals.len();
        for reveal in reveals {
            self.begin_reveal(reveal, now);
        }
        count
    }

    /// Advance everything to the clock's current time.
    ///
    /// Order within a frame: due timers, intersection polling, tweens,
    /// tween continuations, count-ups.
    pub fn frame(&mut self) -> FrameSummary {
        let now = self.clock.now_ms();
        let mut summary = FrameSummary::default();
        self.frames += 1;

        for (_, task) in self.timers.take_due(now) {
            summary.timers_fired += 1;
            self.run_task(task, now);
        }

        if self.config.poll_intersections {
            let mut reveals = Vec::new();
            if !self.dispatcher.is_empty() {
                let entries = measure(
                    &self.document,
                    self.dispatcher.pending_elements(),
                    &self.observer,
                );
                reveals.extend(self.dispatcher.on_intersection(&entries));
            }
            if !self.count_dispatcher.is_empty() {
                let entries = measure(
                    &self.document,
                    self.count_dispatcher.pending_elements(),
                    &self.count_observer,
                );
                reveals.extend(self.count_dispatcher.on_intersection(&entries));
            }
            for reveal in reveals {
                summary.revealed += 1;
                self.begin_reveal(reveal, now);
            }
        }

        summary.tweens = self.scheduler.tick(now, &mut self.document);

        let continuations: Vec<_> = self.completions.borrow_mut().drain(..).collect();
        for then in continuations {
            then(&mut TimerContext { engine: &mut *self });
        }

        summary.counters_running = self.counters.tick(now, &mut self.document);

        tracing::trace!(
            frame = self.frames,
            now_ms = now,
            timers = summary.timers_fired,
            revealed = summary.revealed,
            "engine frame"
        );
        summary
    }

    fn begin_reveal(&mut self, reveal: Reveal<D::Handle>, now: f64) {
        if let Some(kind) = reveal.action.entry {
            let plan = kind.plan();
            if !plan.apply_initial(&mut self.document, reveal.element) {
                tracing::debug!(element = ?reveal.element, "revealed element is gone");
            }
            self.timers.once(
                now,
                self.config.stagger_ms,
                TimerTask::Entry {
                    element: reveal.element,
                    plan,
                },
            );
        }
        if let Some(target) = reveal.action.count {
            self.counters
                .start(reveal.element, target, now, self.config.count_duration_ms);
        }
    }

    fn run_task(&mut self, task: TimerTask<D, C>, now: f64) {
        match task {
            TimerTask::Entry { element, plan } => {
                let started = self.scheduler.start_tween(
                    now,
                    &self.document,
                    element,
                    plan.deltas(),
                    plan.options(),
                );
                if let Err(err) = started {
                    tracing::warn!(element = ?element, %err, "entry tween rejected");
                }
            }
            TimerTask::Callback(callback) => {
                let mut run = callback.borrow_mut();
                (&mut *run)(&mut TimerContext { engine: &mut *self });
            }
        }
    }

    /// True when no tween, timer or count-up is pending. Hosts can stop
    /// requesting frames until the next scroll.
    pub fn is_idle(&self) -> bool {
        !self.scheduler.has_active_tweens() && self.timers.is_empty() && self.counters.is_empty()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Entry animation registry
    pub fn dispatcher(&self) -> &VisibilityDispatcher<D::Handle> {
        &self.dispatcher
    }

    /// Count-up registry
    pub fn count_dispatcher(&self) -> &VisibilityDispatcher<D::Handle> {
        &self.count_dispatcher
    }

    /// Waiting for an entry animation or a count-up
    pub fn is_observed(&self, element: D::Handle) -> bool {
        self.dispatcher.is_observed(element) || self.count_dispatcher.is_observed(element)
    }

    /// Revealed by either observer
    pub fn has_fired(&self, element: D::Handle) -> bool {
        self.dispatcher.has_fired(element) || self.count_dispatcher.has_fired(element)
    }

    pub fn scheduler(&self) -> &TweenScheduler<D::Handle> {
        &self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give the document back
    pub fn into_document(self) -> D {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Rect;
    use crate::memory::{ElementId, MemoryDocument};
    use reveal_animation::{Easing, ManualClock, TransformFn, TransformList};
    use std::cell::Cell;

    type TestEngine = RevealEngine<MemoryDocument, ManualClock>;

    fn engine_with(doc: MemoryDocument) -> (TestEngine, ManualClock) {
        let clock = ManualClock::new();
        let engine = RevealEngine::with_defaults(doc, clock.clone());
        (engine, clock)
    }

    fn run_until(engine: &mut TestEngine, clock: &ManualClock, until_ms: f64) {
        while clock.now_ms() < until_ms {
            clock.advance(16.0_f64.min(until_ms - clock.now_ms()));
            engine.frame();
        }
    }

    fn scale(engine: &TestEngine, el: ElementId) -> Option<f32> {
        let raw = engine.document().inline_style(el, "transform")?;
        TransformList::parse(raw).get(TransformFn::Scale)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RevealConfig {
            threshold: 2.0,
            ..Default::default()
        };
        let result = RevealEngine::new(MemoryDocument::default(), ManualClock::new(), config);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_animate_uses_clock_time() {
        let mut doc = MemoryDocument::default();
        let el = doc.add_element("box", Rect::default());
        let (mut engine, clock) = engine_with(doc);

        clock.advance(1000.0);
        engine
            .animate(el, &[("width", 100.0)], TweenOptions::new(100.0).easing(Easing::Linear))
            .unwrap();

        clock.advance(50.0);
        engine.frame();
        assert_eq!(engine.document().inline_style(el, "width"), Some("50px"));
        assert!(!engine.is_idle());

        clock.advance(50.0);
        engine.frame();
        assert!(engine.is_idle());
    }

    #[test]
    fn test_timers_fire_on_frame() {
        let (mut engine, clock) = engine_with(MemoryDocument::default());
        let hits = Rc::new(Cell::new(0));

        let once = hits.clone();
        engine.set_timeout(100.0, move |_| once.set(once.get() + 1));
        let every = hits.clone();
        let interval = engine.set_interval(300.0, move |_| every.set(every.get() + 10));

        clock.advance(100.0);
        engine.frame();
        assert_eq!(hits.get(), 1);

        clock.advance(200.0);
        engine.frame();
        assert_eq!(hits.get(), 11);

        assert!(engine.clear_timer(interval));
        clock.advance(1000.0);
        engine.frame();
        assert_eq!(hits.get(), 11);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_interval_pulses_scale() {
        let mut doc = MemoryDocument::default();
        let chat = doc.add_element("chat", Rect::new(1200.0, 720.0, 56.0, 56.0));
        let (mut engine, clock) = engine_with(doc);

        engine.set_interval(5000.0, move |ctx| {
            let grow = TweenOptions::new(200.0).easing(Easing::EaseOut);
            ctx.animate(chat, &[("scale", 1.1)], grow).unwrap();
            ctx.set_timeout(200.0, move |ctx| {
                let shrink = TweenOptions::new(200.0).easing(Easing::EaseOut);
                ctx.animate(chat, &[("scale", 1.0)], shrink).unwrap();
            });
        });

        run_until(&mut engine, &clock, 4990.0);
        assert_eq!(scale(&engine, chat), None);

        run_until(&mut engine, &clock, 5100.0);
        assert!(scale(&engine, chat).is_some_and(|s| s > 1.05));

        run_until(&mut engine, &clock, 5500.0);
        assert_eq!(engine.document().inline_style(chat, "transform"), Some("scale(1)"));
        assert_eq!(engine.scheduler().active_count(), 0);

        // The interval keeps going
        run_until(&mut engine, &clock, 10100.0);
        assert!(scale(&engine, chat).is_some_and(|s| s > 1.05));
        assert!(!engine.is_idle());
    }

    #[test]
    fn test_animate_then_chains_tweens() {
        let mut doc = MemoryDocument::default();
        let card = doc.add_element("stage", Rect::new(0.0, 0.0, 300.0, 200.0));
        let (mut engine, clock) = engine_with(doc);
        let completed = Rc::new(Cell::new(false));

        let flag = completed.clone();
        let lift = TweenOptions::new(150.0)
            .easing(Easing::EaseOut)
            .on_complete(move || flag.set(true));
        engine
            .animate_then(card, &[("translateY", -8.0), ("scale", 1.02)], lift, move |ctx| {
                ctx.animate(card, &[("scale", 1.0)], TweenOptions::new(150.0))
                    .unwrap();
            })
            .unwrap();

        clock.advance(150.0);
        engine.frame();
        assert!(completed.get());
        assert_eq!(
            engine.document().inline_style(card, "transform"),
            Some("translateY(-8px) scale(1.02)")
        );
        assert_eq!(engine.scheduler().active_count(), 1);

        clock.advance(150.0);
        engine.frame();
        assert_eq!(
            engine.document().inline_style(card, "transform"),
            Some("translateY(-8px) scale(1)")
        );
        assert!(engine.is_idle());
    }

    #[test]
    fn test_cancelled_tween_skips_continuation() {
        let mut doc = MemoryDocument::default();
        let el = doc.add_element("box", Rect::default());
        let (mut engine, clock) = engine_with(doc);
        let ran = Rc::new(Cell::new(false));

        let flag = ran.clone();
        let id = engine
            .animate_then(el, &[("opacity", 1.0)], TweenOptions::new(100.0), move |_| {
                flag.set(true)
            })
            .unwrap();
        assert!(engine.cancel(id));

        clock.advance(200.0);
        engine.frame();
        assert!(!ran.get());
    }

    #[test]
    fn test_count_up_uses_its_own_observer() {
        let mut doc = MemoryDocument::new(1280.0, 800.0);
        // Inside the entry observer's 50px bottom inset
        let stat = doc.add_element("stat", Rect::new(0.0, 760.0, 200.0, 40.0));
        doc.with_attribute(stat, "data-count", "500")
            .with_attribute(stat, "data-animation", "fade");
        let (mut engine, clock) = engine_with(doc);

        engine.frame();
        assert!(engine.count_dispatcher().has_fired(stat));
        assert!(engine.dispatcher().is_observed(stat));
        assert!(engine.has_fired(stat));

        run_until(&mut engine, &clock, 2100.0);
        assert_eq!(engine.document().text(stat), Some("500"));
        assert_eq!(engine.document().inline_style(stat, "opacity"), None);
    }

    #[test]
    fn test_notify_intersections_without_polling() {
        let mut doc = MemoryDocument::default();
        let el = doc.add_element("hero", Rect::new(0.0, 5000.0, 100.0, 100.0));
        doc.with_attribute(el, "data-animation", "fade");

        let clock = ManualClock::new();
        let config = RevealConfig {
            poll_intersections: false,
            ..Default::default()
        };
        let mut engine = RevealEngine::new(doc, clock.clone(), config).unwrap();

        assert_eq!(engine.notify_intersections(&[IntersectionEntry::visible(el)]), 1);
        assert_eq!(engine.document().inline_style(el, "opacity"), Some("0"));
        assert_eq!(engine.notify_intersections(&[IntersectionEntry::visible(el)]), 0);
    }
}
