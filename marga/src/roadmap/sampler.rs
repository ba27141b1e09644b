//! Free-space waypoint sampling with minimum spacing.

use log::debug;
use rand::Rng;
use rstar::RTree;

use crate::core::WorldPoint;
use crate::grid::OccupancyGrid;

use super::budget::GenerationBudget;
use super::graph::{Waypoint, WaypointId};

/// Result of one sampling pass.
#[derive(Clone, Debug, Default)]
pub struct SampleOutcome {
    /// Accepted waypoints, ids `wp0, wp1, ...` in acceptance order.
    pub waypoints: Vec<Waypoint>,
    /// Rejected draws.
    pub rejected: usize,
    /// The budget fired before sampling finished.
    pub interrupted: bool,
}

/// Draws waypoints uniformly over free cells.
///
/// A draw picks a random free cell and then a random point inside it, so
/// every draw lands in free space. It is accepted when its distance to every
/// accepted waypoint is at least `min_spacing`. Sampling stops after
/// `max_waypoints` acceptances or `max_rejections` rejections in a row.
pub struct Sampler<'a> {
    grid: &'a OccupancyGrid,
    min_spacing: f32,
    max_waypoints: usize,
    max_rejections: usize,
}

impl<'a> Sampler<'a> {
    /// Create a sampler over `grid`.
    pub fn new(
        grid: &'a OccupancyGrid,
        min_spacing: f32,
        max_waypoints: usize,
        max_rejections: usize,
    ) -> Self {
        Self {
            grid,
            min_spacing,
            max_waypoints,
            max_rejections,
        }
    }

    /// Run one sampling pass.
    ///
    /// Ids are assigned from a counter local to this call, starting at `wp0`.
    pub fn sample<R: Rng>(&self, rng: &mut R, budget: &GenerationBudget) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();
        let free_cells = self.grid.free_cells();
        if free_cells.is_empty() {
            debug!("[Sampler] No free cells");
            return outcome;
        }

        let resolution = self.grid.resolution();
        let origin = self.grid.origin();
        let min_spacing_sq = self.min_spacing * self.min_spacing;
        let mut accepted: RTree<[f32; 2]> = RTree::new();
        let mut next_id = 0u32;
        let mut consecutive_rejections = 0usize;

        while outcome.waypoints.len() < self.max_waypoints
            && consecutive_rejections < self.max_rejections
        {
            if budget.is_exhausted() {
                outcome.interrupted = true;
                break;
            }

            let cell = free_cells[rng.random_range(0..free_cells.len())];
            let u: f32 = rng.random();
            let v: f32 = rng.random();
            let point = WorldPoint::new(
                origin.x + (cell.x as f32 + u) * resolution,
                origin.y + (cell.y as f32 + v) * resolution,
            );

            let too_close = accepted
                .nearest_neighbor(&point.to_array())
                .is_some_and(|p| {
                    WorldPoint::from_array(*p).distance_squared(&point) < min_spacing_sq
                });
            // Rounding can push a point onto the next cell's edge
            if too_close || !self.grid.is_free(point) {
                consecutive_rejections += 1;
                outcome.rejected += 1;
                continue;
            }

            consecutive_rejections = 0;
            accepted.insert(point.to_array());
            outcome
                .waypoints
                .push(Waypoint::new(WaypointId(next_id), point));
            next_id += 1;
        }

        debug!(
            "[Sampler] Accepted {} waypoints ({} rejected, {} free cells)",
            outcome.waypoints.len(),
            outcome.rejected,
            free_cells.len()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_grid(size: usize) -> OccupancyGrid {
        let row = ".".repeat(size);
        let rows: Vec<&str> = (0..size).map(|_| row.as_str()).collect();
        OccupancyGrid::from_rows(&rows, 1.0, WorldPoint::ZERO).unwrap()
    }

    #[test]
    fn test_spacing_and_free_space() {
        let grid = OccupancyGrid::from_rows(
            &["..........", "..####....", "..####....", "..........", "....??...."],
            1.0,
            WorldPoint::ZERO,
        )
        .unwrap();
        let sampler = Sampler::new(&grid, 1.5, 100, 300);
        let budget = GenerationBudget::unlimited();
        let outcome = sampler.sample(&mut StdRng::seed_from_u64(3), &budget);

        assert!(outcome.waypoints.len() >= 5);
        for (i, a) in outcome.waypoints.iter().enumerate() {
            assert_eq!(a.id, WaypointId(i as u32));
            assert!(grid.is_free(a.position));
            for b in &outcome.waypoints[i + 1..] {
                assert!(a.position.distance(&b.position) >= 1.5);
            }
        }
    }

    #[test]
    fn test_stops_at_target() {
        let grid = open_grid(20);
        let sampler = Sampler::new(&grid, 0.5, 10, 1000);
        let budget = GenerationBudget::unlimited();
        let outcome = sampler.sample(&mut StdRng::seed_from_u64(1), &budget);
        assert_eq!(outcome.waypoints.len(), 10);
        assert!(!outcome.interrupted);
    }

    #[test]
    fn test_rejection_budget_terminates() {
        // Spacing larger than the map: only one point fits
        let grid = open_grid(4);
        let sampler = Sampler::new(&grid, 100.0, 50, 20);
        let budget = GenerationBudget::unlimited();
        let outcome = sampler.sample(&mut StdRng::seed_from_u64(9), &budget);
        assert_eq!(outcome.waypoints.len(), 1);
        assert_eq!(outcome.rejected, 20);
    }

    #[test]
    fn test_no_free_cells() {
        let grid = OccupancyGrid::from_rows(&["##", "#?"], 1.0, WorldPoint::ZERO).unwrap();
        let sampler = Sampler::new(&grid, 1.0, 10, 10);
        let budget = GenerationBudget::unlimited();
        let outcome = sampler.sample(&mut StdRng::seed_from_u64(0), &budget);
        assert!(outcome.waypoints.is_empty());
    }

    #[test]
    fn test_same_seed_same_points() {
        let grid = open_grid(10);
        let sampler = Sampler::new(&grid, 1.0, 40, 200);
        let budget = GenerationBudget::unlimited();
        let a = sampler.sample(&mut StdRng::seed_from_u64(77), &budget);
        let b = sampler.sample(&mut StdRng::seed_from_u64(77), &budget);
        assert_eq!(a.waypoints, b.waypoints);
    }
}
