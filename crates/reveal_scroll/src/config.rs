//! Reveal configuration (reveal.toml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of an element that must be visible before it is revealed
    pub threshold: f32,
    /// Pixels trimmed off the bottom of the viewport, so elements reveal
    /// slightly after crossing the fold
    pub root_margin_bottom: f32,
    /// Delay between applying an entry's initial state and starting its tween
    pub stagger_ms: f64,
    /// Compute intersections from layout every frame. Hosts with a native
    /// observer turn this off and call `notify_intersections` instead.
    pub poll_intersections: bool,
    /// Duration of count-up animations
    pub count_duration_ms: f64,
    /// Visible fraction that starts a count-up. Count-ups have their own
    /// observer, which by default fires on the first visible pixel.
    pub count_threshold: f32,
    /// Bottom inset of the count-up observer's root
    pub count_root_margin_bottom: f32,
    /// Markup attribute names
    pub attributes: AttributeNames,
}

/// Attribute names scanned at startup
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttributeNames {
    /// Declares the entry animation kind
    pub animation: String,
    /// Direction for slide entries
    pub direction: String,
    /// Integer target for count-up text
    pub count: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            animation: "data-animation".to_string(),
            direction: "data-direction".to_string(),
            count: "data-count".to_string(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: 50.0,
            stagger_ms: 100.0,
            poll_intersections: true,
            count_duration_ms: 2000.0,
            count_threshold: 0.0,
            count_root_margin_bottom: 0.0,
            attributes: AttributeNames::default(),
        }
    }
}

impl RevealConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_observer(
            "threshold",
            self.threshold,
            "root_margin_bottom",
            self.root_margin_bottom,
        )?;
        check_observer(
            "count_threshold",
            self.count_threshold,
            "count_root_margin_bottom",
            self.count_root_margin_bottom,
        )?;
        if !(self.stagger_ms.is_finite() && self.stagger_ms >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stagger_ms must be a non-negative number, got {}",
                self.stagger_ms
            )));
        }
        if !(self.count_duration_ms.is_finite() && self.count_duration_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "count_duration_ms must be positive, got {}",
                self.count_duration_ms
            )));
        }
        let attrs = &self.attributes;
        if [&attrs.animation, &attrs.direction, &attrs.count]
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "attribute names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_observer(
    threshold_key: &str,
    threshold: f32,
    margin_key: &str,
    margin: f32,
) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::Invalid(format!(
            "{threshold_key} must be within 0..=1, got {threshold}"
        )));
    }
    if !(margin.is_finite() && margin >= 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{margin_key} must be a non-negative number, got {margin}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RevealConfig::from_toml_str("").unwrap();
        assert_eq!(config, RevealConfig::default());
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.root_margin_bottom, 50.0);
        assert_eq!(config.stagger_ms, 100.0);
        assert_eq!(config.count_threshold, 0.0);
        assert_eq!(config.count_root_margin_bottom, 0.0);
    }

    #[test]
    fn test_partial_override() {
        let config = RevealConfig::from_toml_str(
            r#"
            threshold = 0.25
            poll_intersections = false

            [attributes]
            animation = "data-reveal"
            "#,
        )
        .unwrap();

        assert_eq!(config.threshold, 0.25);
        assert!(!config.poll_intersections);
        assert_eq!(config.attributes.animation, "data-reveal");
        assert_eq!(config.attributes.count, "data-count");
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = RevealConfig::from_toml_str("threshold = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RevealConfig::from_toml_str("stagger_ms = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RevealConfig::from_toml_str("count_threshold = -0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("count_threshold")));

        let err = RevealConfig::from_toml_str("threshold = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RevealConfig::from_path(Path::new("/nonexistent/reveal.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
