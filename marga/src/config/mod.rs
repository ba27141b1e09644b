//! Configuration loading for marga.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::config::MargaConfig;
//!
//! // Load from default path (configs/marga.yaml)
//! let config = MargaConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = MargaConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`MapSection`] | Overrides for map image thresholds |
//! | [`RoadmapConfig`] | K, D, R, sampling budgets, relaxation, seed, timeout |
//!
//! ## Example YAML
//!
//! ```yaml
//! map:
//!   occupied_thresh: 0.65   # overrides the map YAML
//!   free_thresh: 0.196
//!
//! roadmap:
//!   neighbors: 5            # K
//!   min_spacing: 0.5        # D, meters
//!   connection_radius: 1.5  # R, meters
//!   max_waypoints: 200
//!   max_consecutive_rejections: 500
//!   relaxation_factor: 2.0
//!   seed: 42                # omit for OS entropy
//!   timeout_ms: 2000        # omit for no limit
//! ```

mod defaults;
mod error;
mod marga;
mod roadmap;

pub use error::ConfigLoadError;
pub use marga::{MapSection, MargaConfig};
pub use roadmap::RoadmapConfig;
