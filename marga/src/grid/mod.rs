//! Occupancy grid access.
//!
//! [`OccupancyGrid`] is the read-only view of the map that every roadmap
//! stage queries. It answers two questions: is a point in free space, and is
//! a straight segment between two points collision-free.
//!
//! ```rust,ignore
//! use marga::core::WorldPoint;
//! use marga::grid::OccupancyGrid;
//!
//! let grid = OccupancyGrid::from_rows(&["....", ".##.", "...."], 0.05, WorldPoint::ZERO)?;
//! assert!(grid.is_free(WorldPoint::new(0.01, 0.01)));
//! ```

mod occupancy;

pub use occupancy::{CellCounts, OccupancyGrid};
