//! Roadmap generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoadmapError};

use super::defaults;

/// Parameters for one roadmap generation pass.
///
/// Distances are in world units (meters), matching the grid resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// Maximum edges the connector adds per waypoint (K).
    /// Default: 5
    #[serde(default = "defaults::neighbors")]
    pub neighbors: usize,

    /// Minimum distance between any two waypoints (D, meters).
    /// Default: 0.5
    #[serde(default = "defaults::min_spacing")]
    pub min_spacing: f32,

    /// Neighbor search radius for the connector (R, meters).
    /// Also the base of the repair relaxation schedule.
    /// Default: 1.5
    #[serde(default = "defaults::connection_radius")]
    pub connection_radius: f32,

    /// Stop sampling after this many waypoints (at least 2).
    /// Default: 200
    #[serde(default = "defaults::max_waypoints")]
    pub max_waypoints: usize,

    /// Stop sampling after this many rejected draws in a row.
    /// Default: 500
    #[serde(default = "defaults::max_consecutive_rejections")]
    pub max_consecutive_rejections: usize,

    /// Growth factor of the repair radius per relaxation stage.
    /// Stage k admits pairs up to `connection_radius * factor^k`.
    /// Default: 2.0
    #[serde(default = "defaults::relaxation_factor")]
    pub relaxation_factor: f32,

    /// Seed for the random generator. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Wall-clock limit for one generation pass (milliseconds).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            neighbors: defaults::neighbors(),
            min_spacing: defaults::min_spacing(),
            connection_radius: defaults::connection_radius(),
            max_waypoints: defaults::max_waypoints(),
            max_consecutive_rejections: defaults::max_consecutive_rejections(),
            relaxation_factor: defaults::relaxation_factor(),
            seed: None,
            timeout_ms: None,
        }
    }
}

impl RoadmapConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the neighbor count K.
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }

    /// Builder-style setter for the minimum spacing D.
    pub fn with_min_spacing(mut self, spacing: f32) -> Self {
        self.min_spacing = spacing;
        self
    }

    /// Builder-style setter for the connection radius R.
    pub fn with_connection_radius(mut self, radius: f32) -> Self {
        self.connection_radius = radius;
        self
    }

    /// Builder-style setter for the waypoint target.
    pub fn with_max_waypoints(mut self, max: usize) -> Self {
        self.max_waypoints = max;
        self
    }

    /// Builder-style setter for the rejection budget.
    pub fn with_max_consecutive_rejections(mut self, max: usize) -> Self {
        self.max_consecutive_rejections = max;
        self
    }

    /// Builder-style setter for the relaxation factor.
    pub fn with_relaxation_factor(mut self, factor: f32) -> Self {
        self.relaxation_factor = factor;
        self
    }

    /// Builder-style setter for the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder-style setter for the generation timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(RoadmapError::InvalidConfig(
                "neighbors (K) must be at least 1".into(),
            ));
        }
        if !(self.min_spacing.is_finite() && self.min_spacing > 0.0) {
            return Err(RoadmapError::InvalidConfig(format!(
                "min_spacing (D) must be positive, got {}",
                self.min_spacing
            )));
        }
        if !(self.connection_radius.is_finite() && self.connection_radius > 0.0) {
            return Err(RoadmapError::InvalidConfig(format!(
                "connection_radius (R) must be positive, got {}",
                self.connection_radius
            )));
        }
        if !(self.relaxation_factor.is_finite() && self.relaxation_factor > 1.0) {
            return Err(RoadmapError::InvalidConfig(format!(
                "relaxation_factor must be greater than 1, got {}",
                self.relaxation_factor
            )));
        }
        if self.max_waypoints < 2 {
            return Err(RoadmapError::InvalidConfig(
                "max_waypoints must be at least 2".into(),
            ));
        }
        if self.max_consecutive_rejections == 0 {
            return Err(RoadmapError::InvalidConfig(
                "max_consecutive_rejections must be at least 1".into(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(RoadmapError::InvalidConfig(
                "timeout_ms must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}
