//! Scenario runner
//!
//! Loads a scene into a [`MemoryDocument`], drives a [`RevealEngine`] on a
//! manual clock and evaluates the scenario's assertions between frames.

use crate::report::RunReport;
use crate::scenario::{Scenario, ScenarioStep};
use crate::scene::Scene;
use anyhow::Result;
use reveal_animation::{FrameClock, ManualClock};
use reveal_scroll::{MemoryDocument, RevealEngine};

/// Frame pacing for a run
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Simulated frame interval
    pub frame_ms: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { frame_ms: 16.0 }
    }
}

/// Failed assertion details
struct Failure {
    message: String,
}

type Engine = RevealEngine<MemoryDocument, ManualClock>;

/// Run `scenario` against `scene`.
///
/// The first frame runs at time zero, before any step, the way a page gets
/// its first frame right after load. A failed assertion stops the run.
pub fn run(scene: &Scene, scenario: &Scenario, config: RunConfig) -> Result<RunReport> {
    let clock = ManualClock::new();
    let mut engine = RevealEngine::new(scene.build_document(), clock.clone(), scene.engine.clone())?;
    let frame_ms = config.frame_ms.max(1.0);

    engine.frame();

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step = step_index, kind = step.name(), "scenario step");
        match step {
            ScenarioStep::Wait { ms } => {
                let mut remaining = *ms as f64;
                while remaining > 0.0 {
                    let dt = remaining.min(frame_ms);
                    clock.advance(dt);
                    engine.frame();
                    remaining -= dt;
                }
            }
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    clock.advance(frame_ms);
                    engine.frame();
                }
            }
            ScenarioStep::Scroll { y } => engine.document_mut().scroll_to(*y),
            _ => {
                if let Err(failure) = evaluate(&engine, step) {
                    return Ok(RunReport::failed(
                        step.name(),
                        step_index,
                        failure.message,
                        engine.frame_count(),
                        elapsed_ms(&clock),
                        revealed(&engine),
                    ));
                }
            }
        }
    }

    Ok(RunReport::passed(
        engine.frame_count(),
        elapsed_ms(&clock),
        revealed(&engine),
    ))
}

fn evaluate(engine: &Engine, step: &ScenarioStep) -> Result<(), Failure> {
    let doc = engine.document();
    let find = |id: &str| {
        doc.find(id).ok_or_else(|| Failure {
            message: format!("{id}: element not found"),
        })
    };

    match step {
        ScenarioStep::AssertStyle {
            id,
            property,
            value,
        } => {
            let el = find(id.as_str())?;
            match doc.inline_style(el, property) {
                Some(actual) if actual == value.as_str() => Ok(()),
                Some(actual) => Err(Failure {
                    message: format!("{id}: expected {property} '{value}', got '{actual}'"),
                }),
                None => Err(Failure {
                    message: format!("{id}: {property} is not set"),
                }),
            }
        }
        ScenarioStep::AssertText { id, value } => {
            let el = find(id.as_str())?;
            let actual = doc.text(el).unwrap_or_default();
            if actual == value.as_str() {
                Ok(())
            } else {
                Err(Failure {
                    message: format!("{id}: expected text '{value}', got '{actual}'"),
                })
            }
        }
        ScenarioStep::AssertFired { id } => {
            let el = find(id.as_str())?;
            if engine.has_fired(el) {
                Ok(())
            } else {
                Err(Failure {
                    message: format!("{id}: not revealed"),
                })
            }
        }
        ScenarioStep::AssertIdle => {
            if engine.is_idle() {
                Ok(())
            } else {
                Err(Failure {
                    message: format!(
                        "engine busy: {} tweens in flight",
                        engine.scheduler().active_count()
                    ),
                })
            }
        }
        ScenarioStep::Wait { .. } | ScenarioStep::Tick { .. } | ScenarioStep::Scroll { .. } => {
            Ok(())
        }
    }
}

fn elapsed_ms(clock: &ManualClock) -> u64 {
    clock.now_ms().round() as u64
}

fn revealed(engine: &Engine) -> Vec<String> {
    engine
        .document()
        .ids()
        .filter(|(el, _)| engine.has_fired(*el))
        .map(|(_, id)| id.to_string())
        .collect()
}
