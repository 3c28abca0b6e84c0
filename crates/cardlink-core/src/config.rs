//! Editor configuration.

use crate::geometry::MIN_CARD_SIZE;
use crate::style::{ConnectionStyle, ConnectorStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for card placement, geometry and connector styling.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Position of the first card on both axes.
    pub stagger_origin: f64,
    /// Offset added per already existing card on both axes.
    pub stagger_step: f64,
    /// Width of a newly created card.
    pub card_width: f64,
    /// Height of a newly created card.
    pub card_height: f64,
    /// Smallest width or height a resize may produce.
    pub min_card_size: f64,
    /// Grid cell size for drag snapping (None = free positioning).
    pub snap_grid: Option<f64>,
    /// Default connector styling.
    pub connector: ConnectorStyle,
    /// Styling for links drawn with the arrow tool.
    pub link: ConnectionStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stagger_origin: 100.0,
            stagger_step: 20.0,
            card_width: 200.0,
            card_height: 120.0,
            min_card_size: MIN_CARD_SIZE,
            snap_grid: None,
            connector: ConnectorStyle::default(),
            link: ConnectionStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.stagger_origin - 100.0).abs() < f64::EPSILON);
        assert!((config.stagger_step - 20.0).abs() < f64::EPSILON);
        assert!(config.snap_grid.is_none());
        assert_eq!(config.min_card_size, MIN_CARD_SIZE);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = EditorConfig::from_json(r#"{"stagger_step": 40.0, "snap_grid": 10.0}"#).unwrap();
        assert!((config.stagger_step - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.snap_grid, Some(10.0));
        assert!((config.stagger_origin - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.link, ConnectionStyle::default());
    }

    #[test]
    fn test_invalid_json() {
        let result = EditorConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"card_width": 320.0}}"#).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert!((config.card_width - 320.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditorConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
