//! K-nearest, radius-bounded edge construction.

use log::debug;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::grid::OccupancyGrid;

use super::budget::GenerationBudget;
use super::graph::{EdgeKind, WaypointGraph, WaypointId};

/// Result of one connection pass.
#[derive(Clone, Debug, Default)]
pub struct ConnectOutcome {
    /// New edges added.
    pub added: usize,
    /// Candidates dropped because the straight segment was blocked.
    pub blocked: usize,
    /// The budget fired before every waypoint was visited.
    pub interrupted: bool,
}

/// Links each waypoint to up to K neighbors within radius R.
///
/// Waypoints are visited in id order. Candidates within R are tried nearest
/// first (ties by id). An edge that already exists, because the other
/// endpoint picked this waypoint earlier, counts toward K without being
/// duplicated. Blocked candidates are skipped.
pub struct Connector<'a> {
    grid: &'a OccupancyGrid,
    neighbors: usize,
    radius: f32,
}

impl<'a> Connector<'a> {
    /// Create a connector over `grid`.
    pub fn new(grid: &'a OccupancyGrid, neighbors: usize, radius: f32) -> Self {
        Self {
            grid,
            neighbors,
            radius,
        }
    }

    /// Add local edges to `graph`.
    pub fn connect(&self, graph: &mut WaypointGraph, budget: &GenerationBudget) -> ConnectOutcome {
        let mut outcome = ConnectOutcome::default();
        let tree = RTree::bulk_load(
            graph
                .waypoints()
                .iter()
                .map(|w| GeomWithData::new(w.position.to_array(), w.id))
                .collect(),
        );
        let radius_sq = self.radius * self.radius;

        for index in 0..graph.len() {
            if budget.is_exhausted() {
                outcome.interrupted = true;
                break;
            }

            let id = WaypointId(index as u32);
            let position = graph.waypoints()[index].position;

            let mut candidates: Vec<(f32, WaypointId)> = tree
                .locate_within_distance(position.to_array(), radius_sq)
                .filter(|c| c.data != id)
                .map(|c| {
                    let other = graph.waypoints()[c.data.index()].position;
                    (position.distance(&other), c.data)
                })
                .collect();
            candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let mut linked = 0;
            for (_, other) in candidates {
                if linked >= self.neighbors {
                    break;
                }
                if graph.has_edge(id, other) {
                    linked += 1;
                    continue;
                }
                let other_position = graph.waypoints()[other.index()].position;
                if self.grid.is_line_free(position, other_position) {
                    graph.add_edge(id, other, EdgeKind::Local);
                    outcome.added += 1;
                    linked += 1;
                } else {
                    outcome.blocked += 1;
                }
            }
        }

        debug!(
            "[Connector] Added {} edges (K={}, R={:.2}), {} candidates blocked",
            outcome.added, self.neighbors, self.radius, outcome.blocked
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;

    fn open_grid() -> OccupancyGrid {
        OccupancyGrid::from_rows(&["......"; 6], 1.0, WorldPoint::ZERO).unwrap()
    }

    #[test]
    fn test_respects_radius() {
        let grid = open_grid();
        let mut graph = WaypointGraph::from_positions(&[
            WorldPoint::new(0.5, 0.5),
            WorldPoint::new(1.5, 0.5),
            WorldPoint::new(5.5, 5.5),
        ]);
        Connector::new(&grid, 5, 2.0).connect(&mut graph, &GenerationBudget::unlimited());

        assert!(graph.has_edge(WaypointId(0), WaypointId(1)));
        assert!(graph.waypoint(WaypointId(2)).unwrap().neighbors.is_empty());
    }

    #[test]
    fn test_k_nearest_and_existing_edges_count() {
        let grid = open_grid();
        // 0 at the center, 1..=4 at increasing distances
        let mut graph = WaypointGraph::from_positions(&[
            WorldPoint::new(3.0, 3.0),
            WorldPoint::new(3.5, 3.0),
            WorldPoint::new(3.0, 4.0),
            WorldPoint::new(1.5, 3.0),
            WorldPoint::new(3.0, 1.0),
        ]);
        Connector::new(&grid, 2, 3.0).connect(&mut graph, &GenerationBudget::unlimited());

        // wp0 links its two nearest
        assert!(graph.has_edge(WaypointId(0), WaypointId(1)));
        assert!(graph.has_edge(WaypointId(0), WaypointId(2)));
        assert!(!graph.has_edge(WaypointId(0), WaypointId(3)));
        // wp1's two nearest are wp0 (existing) and wp2
        assert!(graph.has_edge(WaypointId(1), WaypointId(2)));
        assert!(!graph.has_edge(WaypointId(1), WaypointId(3)));
        // No duplicate edges
        let pairs: std::collections::BTreeSet<_> =
            graph.edges().iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs.len(), graph.edge_count());
    }

    #[test]
    fn test_equidistant_candidates_prefer_lower_id() {
        let grid = open_grid();
        let mut graph = WaypointGraph::from_positions(&[
            WorldPoint::new(3.0, 3.0),
            WorldPoint::new(4.5, 3.0),
            WorldPoint::new(1.5, 3.0),
            WorldPoint::new(1.0, 3.0),
        ]);
        Connector::new(&grid, 1, 3.0).connect(&mut graph, &GenerationBudget::unlimited());

        // wp1 and wp2 are both 1.5 from wp0; wp2 then takes its own nearest
        assert!(graph.has_edge(WaypointId(0), WaypointId(1)));
        assert!(!graph.has_edge(WaypointId(0), WaypointId(2)));
        assert!(graph.has_edge(WaypointId(2), WaypointId(3)));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_blocked_segment_is_skipped() {
        let grid = OccupancyGrid::from_rows(
            &["......", "...#..", "...#..", "...#..", "......"],
            1.0,
            WorldPoint::ZERO,
        )
        .unwrap();
        let mut graph = WaypointGraph::from_positions(&[
            WorldPoint::new(2.5, 2.5),
            WorldPoint::new(4.5, 2.5),
        ]);
        let outcome =
            Connector::new(&grid, 3, 5.0).connect(&mut graph, &GenerationBudget::unlimited());

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(outcome.blocked, 2);
    }

    #[test]
    fn test_every_edge_is_line_free() {
        let grid = OccupancyGrid::from_rows(
            &["......", ".##...", ".##.#.", "....#.", "......"],
            1.0,
            WorldPoint::ZERO,
        )
        .unwrap();
        let positions: Vec<_> = grid
            .free_cells()
            .into_iter()
            .map(|c| grid.grid_to_world(c))
            .collect();
        let mut graph = WaypointGraph::from_positions(&positions);
        Connector::new(&grid, 4, 2.5).connect(&mut graph, &GenerationBudget::unlimited());

        assert!(graph.edge_count() > 0);
        for edge in graph.edges() {
            let a = graph.waypoint(edge.a).unwrap().position;
            let b = graph.waypoint(edge.b).unwrap().position;
            assert!(grid.is_line_free(a, b));
            assert!(edge.length <= 2.5 + 1e-5);
            assert_eq!(edge.kind, EdgeKind::Local);
        }
    }
}
