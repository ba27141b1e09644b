//! Error types for marga

use thiserror::Error;

/// Roadmap generation error type
#[derive(Error, Debug)]
pub enum RoadmapError {
    /// Grid dimensions, resolution or origin are inconsistent
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Fewer than two waypoints fit in free space
    #[error("Insufficient free space: only {sampled} waypoint(s) could be sampled")]
    InsufficientFreeSpace {
        /// Waypoints the sampler accepted
        sampled: usize,
    },

    /// Generation parameters out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Map YAML or image could not be interpreted
    #[error("Map load failed: {0}")]
    MapLoad(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for RoadmapError {
    fn from(e: image::ImageError) -> Self {
        RoadmapError::MapLoad(e.to_string())
    }
}

impl From<serde_yaml::Error> for RoadmapError {
    fn from(e: serde_yaml::Error) -> Self {
        RoadmapError::MapLoad(e.to_string())
    }
}

/// Result alias for marga operations
pub type Result<T> = std::result::Result<T, RoadmapError>;
