//! Scenario definition for headless scroll runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of steps played against a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse scenario")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Advance the clock by `ms`, one frame per frame interval
    Wait { ms: u64 },
    /// Run `frames` frames
    Tick { frames: u32 },
    /// Scroll the page. Takes effect on the next frame.
    Scroll { y: f32 },
    /// Inline style of `id` equals `value`
    AssertStyle {
        id: String,
        property: String,
        value: String,
    },
    /// Text content of `id` equals `value`
    AssertText { id: String, value: String },
    /// `id` has been revealed
    AssertFired { id: String },
    /// No tween, timer or count-up is pending
    AssertIdle,
}

impl ScenarioStep {
    /// Name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Scroll { .. } => "scroll",
            ScenarioStep::AssertStyle { .. } => "assert_style",
            ScenarioStep::AssertText { .. } => "assert_text",
            ScenarioStep::AssertFired { .. } => "assert_fired",
            ScenarioStep::AssertIdle => "assert_idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_json(
            r#"{"steps": [
                {"type": "wait", "ms": 250},
                {"type": "tick", "frames": 3},
                {"type": "scroll", "y": 1200},
                {"type": "assert_style", "id": "hero", "property": "opacity", "value": "1"},
                {"type": "assert_fired", "id": "hero"},
                {"type": "assert_idle"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            scenario.steps,
            vec![
                ScenarioStep::Wait { ms: 250 },
                ScenarioStep::Tick { frames: 3 },
                ScenarioStep::Scroll { y: 1200.0 },
                ScenarioStep::AssertStyle {
                    id: "hero".to_string(),
                    property: "opacity".to_string(),
                    value: "1".to_string(),
                },
                ScenarioStep::AssertFired {
                    id: "hero".to_string()
                },
                ScenarioStep::AssertIdle,
            ]
        );
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let err = Scenario::from_json(r#"{"steps": [{"type": "click", "id": "x"}]}"#).unwrap_err();
        assert!(format!("{err:#}").contains("click"));
    }
}
