//! Core types for the marga roadmap library.
//!
//! - [`GridCoord`] and [`WorldPoint`]: integer cell indices and world
//!   coordinates in meters
//! - [`CellState`]: free / occupied / unknown cell classification
//!
//! Coordinates follow the ROS map convention: cell (0, 0) sits at the grid
//! origin and rows grow along +Y.

mod cell;
mod point;

pub use cell::CellState;
pub use point::{GridCoord, WorldPoint};
