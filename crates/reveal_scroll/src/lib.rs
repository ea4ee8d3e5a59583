//! Reveal Scroll Runtime
//!
//! Plays one-shot entry animations the first time marked-up elements scroll
//! into view.
//!
//! - **Dispatcher**: registry of `data-animation` / `data-count` elements,
//!   each revealed at most once
//! - **Entry presets**: flip, slide, fade and the default rise-and-fade
//! - **Count-ups**: integer text that eases up to its declared value
//! - **Engine**: one service object per page that drives timers, reveals,
//!   tweens and counters from a single per-frame call
//!
//! # Example
//!
//! ```rust
//! use reveal_scroll::{MemoryDocument, Rect, RevealEngine};
//! use reveal_animation::ManualClock;
//!
//! let mut doc = MemoryDocument::new(1280.0, 800.0);
//! let card = doc.add_element("card", Rect::new(0.0, 100.0, 300.0, 200.0));
//! doc.set_attribute(card, "data-animation", "fade");
//!
//! let clock = ManualClock::new();
//! let mut engine = RevealEngine::with_defaults(doc, clock.clone());
//!
//! // First frame reveals the card and hides it for the stagger delay
//! engine.frame();
//! assert_eq!(engine.document().inline_style(card, "opacity"), Some("0"));
//!
//! // 100ms stagger + 1000ms fade
//! for _ in 0..70 {
//!     clock.advance(16.0);
//!     engine.frame();
//! }
//! assert_eq!(engine.document().inline_style(card, "opacity"), Some("1"));
//! assert!(engine.is_idle());
//! ```

pub mod config;
pub mod counter;
pub mod dispatcher;
pub mod document;
pub mod engine;
pub mod entry;
pub mod intersection;
pub mod memory;

pub use config::{AttributeNames, ConfigError, RevealConfig};
pub use counter::{CountUp, Counters};
pub use dispatcher::{ObserveState, ObservedElement, Reveal, RevealAction, VisibilityDispatcher};
pub use document::{Document, Rect};
pub use engine::{FrameSummary, RevealEngine, TimerCallback, TimerContext, TimerTask};
pub use entry::{AnimationKind, EntryPlan, SlideDirection};
pub use intersection::{measure, IntersectionEntry, ObserverOptions};
pub use memory::{ElementId, MemoryDocument};
