//! Main MargaConfig and file loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::roadmap::RoadmapConfig;

/// Map interpretation settings
///
/// Thresholds override the values in the map's own YAML file when set.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MapSection {
    /// Occupancy probability above which a pixel is an obstacle (0.0-1.0)
    #[serde(default)]
    pub occupied_thresh: Option<f32>,

    /// Occupancy probability below which a pixel is free (0.0-1.0)
    #[serde(default)]
    pub free_thresh: Option<f32>,
}

/// Full marga configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MargaConfig {
    /// Map settings
    #[serde(default)]
    pub map: MapSection,

    /// Roadmap generation settings
    #[serde(default)]
    pub roadmap: RoadmapConfig,
}

impl MargaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/marga.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/marga.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MargaConfig::default();
        assert_eq!(config.map.occupied_thresh, None);
        assert_eq!(config.roadmap.neighbors, 5);
        assert_eq!(config.roadmap.seed, None);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = MargaConfig::from_yaml(
            "map:\n  free_thresh: 0.2\nroadmap:\n  neighbors: 3\n  seed: 42\n  timeout_ms: 250\n",
        )
        .unwrap();
        assert_eq!(config.roadmap.neighbors, 3);
        assert_eq!(config.roadmap.seed, Some(42));
        assert_eq!(config.roadmap.timeout_ms, Some(250));
        assert_eq!(config.roadmap.min_spacing, 0.5);
        assert_eq!(config.map.free_thresh, Some(0.2));
        assert_eq!(config.map.occupied_thresh, None);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MargaConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = MargaConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.roadmap.connection_radius, config.roadmap.connection_radius);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = MargaConfig::from_yaml(include_str!("../../../configs/marga.yaml")).unwrap();
        assert!(config.roadmap.validate().is_ok());
        assert_eq!(config.roadmap.seed, None);
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = MargaConfig::from_yaml("roadmap: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MargaConfig::load(Path::new("/nonexistent/marga.yaml")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }
}
