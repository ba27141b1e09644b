//! Point and coordinate types for the occupancy grid.

use serde::{Deserialize, Serialize};

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// World coordinates (meters, f32)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation towards `other` (`t = 0` is self, `t = 1` is other)
    #[inline]
    pub fn lerp(&self, other: &WorldPoint, t: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// As an `[x, y]` array, the point representation used by the R-tree.
    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Build from an `[x, y]` array.
    #[inline]
    pub fn from_array(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}
