//! Scene files (scene.toml)
//!
//! A scene describes a static page: viewport size, engine settings and the
//! laid-out elements with their markup attributes.

use anyhow::{Context, Result};
use reveal_scroll::{Document, MemoryDocument, Rect, RevealConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level scene definition
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Scene {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub engine: RevealConfig,
    #[serde(default, rename = "element")]
    pub elements: Vec<SceneElement>,
}

/// Visible area of the page
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// Initial scroll offset
    #[serde(default)]
    pub scroll_y: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            scroll_y: 0.0,
        }
    }
}

/// One element on the page
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneElement {
    pub id: String,
    #[serde(default)]
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_element_width")]
    pub width: f32,
    pub height: f32,
    /// Entry animation kind
    #[serde(default)]
    pub animation: Option<String>,
    /// Slide direction
    #[serde(default)]
    pub direction: Option<String>,
    /// Count-up target, kept as text so malformed values reach the engine
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Extra attributes, written verbatim
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_element_width() -> f32 {
    400.0
}

impl Scene {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let scene: Self = toml::from_str(input).context("Failed to parse scene")?;
        scene.engine.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Lay the scene out in a fresh document.
    ///
    /// Shorthand fields are written under the attribute names configured in
    /// `[engine.attributes]`.
    pub fn build_document(&self) -> MemoryDocument {
        let names = &self.engine.attributes;
        let mut doc = MemoryDocument::new(self.viewport.width, self.viewport.height);

        for element in &self.elements {
            let el = doc.add_element(
                element.id.as_str(),
                Rect::new(element.x, element.y, element.width, element.height),
            );
            if let Some(kind) = &element.animation {
                doc.set_attribute(el, &names.animation, kind);
            }
            if let Some(direction) = &element.direction {
                doc.set_attribute(el, &names.direction, direction);
            }
            if let Some(count) = &element.count {
                doc.set_attribute(el, &names.count, count);
            }
            for (name, value) in &element.attributes {
                doc.set_attribute(el, name, value);
            }
            if let Some(text) = &element.text {
                doc.set_text(el, text);
            }
        }

        doc.scroll_to(self.viewport.scroll_y);
        tracing::debug!(elements = self.elements.len(), "scene loaded");
        doc
    }
}
