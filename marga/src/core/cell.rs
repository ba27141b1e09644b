//! Cell states for the occupancy grid.
//!
//! Roadmap generation only distinguishes three states. Anything that is not
//! positively known to be free is treated as blocked.

use serde::{Deserialize, Serialize};

/// Occupancy state of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Cell has never been observed
    #[default]
    Unknown = 0,

    /// Traversable free space
    Free = 1,

    /// Obstacle
    Occupied = 2,
}

impl CellState {
    /// Can the robot stand in this cell?
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, CellState::Free)
    }

    /// Convert a ROS `nav_msgs/OccupancyGrid` value.
    ///
    /// Negative values are unknown, values at or above `occupied_threshold`
    /// are occupied, everything else is free.
    #[inline]
    pub fn from_occupancy(value: i8, occupied_threshold: i8) -> Self {
        if value < 0 {
            CellState::Unknown
        } else if value >= occupied_threshold {
            CellState::Occupied
        } else {
            CellState::Free
        }
    }

    /// Parse the single character representation.
    ///
    /// Returns `None` for characters that are not part of the map alphabet.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(CellState::Free),
            '#' => Some(CellState::Occupied),
            '?' => Some(CellState::Unknown),
            _ => None,
        }
    }
}
