//! # Marga
//!
//! Probabilistic roadmap (PRM) generation from 2D occupancy grids.
//!
//! ## Overview
//!
//! Marga turns an occupancy grid into a waypoint graph a mobile robot can
//! plan over:
//!
//! - **Sampling** - waypoints drawn uniformly in free space, at least D apart
//! - **Connection** - each waypoint linked to up to K neighbors within R,
//!   keeping only segments that stay in free space
//! - **Repair** - disconnected components joined with the shortest free
//!   segments under a growing search radius
//!
//! A pass ends `Connected`, `Unconnectable` (walls split free space) or
//! `TimedOut` (the caller's budget fired first).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::{MargaConfig, RoadmapBuilder, load_map};
//!
//! let config = MargaConfig::load_default()?;
//! let grid = load_map("maps/office.yaml", &config.map)?;
//! let roadmap = RoadmapBuilder::new(&grid, config.roadmap).build()?;
//!
//! for wp in roadmap.waypoint_list() {
//!     println!("{} ({:.2}, {:.2})", wp.id, wp.x, wp.y);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! ROS map convention: the grid origin is the world position of the
//! lower-left corner of cell (0, 0), rows grow along +Y, distances are in
//! meters.

#![warn(missing_docs)]

// Core types
pub mod core;

// Occupancy grid access
pub mod grid;

// YAML configuration
pub mod config;

// Sampling, connection, repair and the finished roadmap
pub mod roadmap;

// Map loading and SVG export
pub mod io;

pub mod error;

// Re-export commonly used types
pub use core::{CellState, GridCoord, WorldPoint};

pub use grid::{CellCounts, OccupancyGrid};

pub use config::{ConfigLoadError, MapSection, MargaConfig, RoadmapConfig};

pub use roadmap::{
    ConnectivityStatus, Edge, EdgeKind, GenerationBudget, GenerationStats, Roadmap,
    RoadmapBuilder, Waypoint, WaypointId,
};

pub use io::{SvgOptions, load_map, render_svg};

pub use error::{Result, RoadmapError};

/// Build a roadmap with an unlimited budget.
///
/// Shorthand for `RoadmapBuilder::new(grid, config.clone()).build()`.
pub fn generate_roadmap(grid: &OccupancyGrid, config: &RoadmapConfig) -> Result<Roadmap> {
    RoadmapBuilder::new(grid, config.clone()).build()
}
