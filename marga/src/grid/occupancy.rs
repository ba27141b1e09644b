//! Immutable occupancy grid with traversability queries.

use crate::core::{CellState, GridCoord, WorldPoint};
use crate::error::{Result, RoadmapError};

/// Cell tallies for a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellCounts {
    /// Unknown cells (never observed).
    pub unknown: usize,
    /// Free cells (traversable).
    pub free: usize,
    /// Occupied cells (obstacles).
    pub occupied: usize,
}

impl CellCounts {
    /// Total known cells.
    pub fn known(&self) -> usize {
        self.free + self.occupied
    }

    /// Total cells.
    pub fn total(&self) -> usize {
        self.unknown + self.known()
    }
}

/// Row-major occupancy grid.
///
/// Cell `(x, y)` lives at index `y * width + x`. The origin is the world
/// position of the lower-left corner of cell `(0, 0)`.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    resolution: f32,
    inv_resolution: f32,
    origin: WorldPoint,
    cells: Vec<CellState>,
}

impl OccupancyGrid {
    /// Create a grid from its cell array.
    ///
    /// Fails with [`RoadmapError::InvalidGrid`] when `cells.len()` does not
    /// match `width * height`, when the grid is empty, or when the resolution
    /// is not a positive finite number.
    pub fn new(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        cells: Vec<CellState>,
    ) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(RoadmapError::InvalidGrid(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        if width == 0 || height == 0 {
            return Err(RoadmapError::InvalidGrid(format!(
                "grid has no cells ({}x{})",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            RoadmapError::InvalidGrid(format!("grid {}x{} is too large", width, height))
        })?;
        if cells.len() != expected {
            return Err(RoadmapError::InvalidGrid(format!(
                "expected {} cells for {}x{}, got {}",
                expected,
                width,
                height,
                cells.len()
            )));
        }
        if !(origin.x.is_finite() && origin.y.is_finite()) {
            return Err(RoadmapError::InvalidGrid("origin is not finite".into()));
        }

        Ok(Self {
            width,
            height,
            resolution,
            inv_resolution: 1.0 / resolution,
            origin,
            cells,
        })
    }

    /// Create a grid from ROS `nav_msgs/OccupancyGrid` values.
    ///
    /// See [`CellState::from_occupancy`] for the classification rule.
    pub fn from_occupancy(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        data: &[i8],
        occupied_threshold: i8,
    ) -> Result<Self> {
        let cells = data
            .iter()
            .map(|&v| CellState::from_occupancy(v, occupied_threshold))
            .collect();
        Self::new(width, height, resolution, origin, cells)
    }

    /// Create a grid from character rows (`.` free, `#` occupied, `?` unknown).
    ///
    /// The first row is the top of the map (highest `y`), matching how the
    /// rows read on screen.
    pub fn from_rows(rows: &[&str], resolution: f32, origin: WorldPoint) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut cells = vec![CellState::Unknown; width * height];

        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(RoadmapError::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.chars().count(),
                    width
                )));
            }
            let y = height - 1 - row_idx;
            for (x, c) in row.chars().enumerate() {
                cells[y * width + x] = CellState::from_char(c).ok_or_else(|| {
                    RoadmapError::InvalidGrid(format!("unknown cell character {:?}", c))
                })?;
            }
        }

        Self::new(width, height, resolution, origin, cells)
    }

    /// Grid width (cells)
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (cells)
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size (meters)
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World position of the lower-left corner of cell (0, 0)
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Raw cell array (row-major)
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Convert world coordinates to grid coordinates.
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) * self.inv_resolution).floor() as i32;
        let y = ((point.y - self.origin.y) * self.inv_resolution).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Convert grid coordinates to world coordinates (cell center).
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.resolution,
            self.origin.y + (coord.y as f32 + 0.5) * self.resolution,
        )
    }

    /// Check if grid coordinates are within bounds.
    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// State of a cell, `None` outside the grid.
    #[inline]
    pub fn cell(&self, coord: GridCoord) -> Option<CellState> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// State of the cell containing a world point, `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellState> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        self.cell(self.world_to_grid(point))
    }

    /// Is the world point inside a free cell?
    ///
    /// Points outside the grid, and points in occupied or unknown cells, are
    /// not free.
    #[inline]
    pub fn is_free(&self, point: WorldPoint) -> bool {
        self.cell_at(point).is_some_and(CellState::is_free)
    }

    /// Is the straight segment from `a` to `b` entirely in free space?
    ///
    /// The segment is sampled at steps of at most half a cell, endpoints
    /// included. A zero-length segment is free.
    pub fn is_line_free(&self, a: WorldPoint, b: WorldPoint) -> bool {
        let length = a.distance(&b);
        if length == 0.0 {
            return true;
        }
        if !length.is_finite() {
            return false;
        }

        let steps = (length / (0.5 * self.resolution)).ceil().max(1.0) as usize;
        (0..=steps).all(|i| self.is_free(a.lerp(&b, i as f32 / steps as f32)))
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> Vec<GridCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_free())
            .map(|(i, _)| GridCoord::new((i % self.width) as i32, (i / self.width) as i32))
            .collect()
    }

    /// Number of free cells.
    pub fn free_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_free()).count()
    }

    /// Tally cells by state.
    pub fn cell_counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for cell in &self.cells {
            match cell {
                CellState::Unknown => counts.unknown += 1,
                CellState::Free => counts.free += 1,
                CellState::Occupied => counts.occupied += 1,
            }
        }
        counts
    }

    /// World bounds of the grid as (min, max).
    pub fn bounds(&self) -> (WorldPoint, WorldPoint) {
        let max = WorldPoint::new(
            self.origin.x + self.width as f32 * self.resolution,
            self.origin.y + self.height as f32 * self.resolution,
        );
        (self.origin, max)
    }

    /// Length of the grid diagonal in meters.
    pub fn diagonal(&self) -> f32 {
        let (min, max) = self.bounds();
        min.distance(&max)
    }
}
