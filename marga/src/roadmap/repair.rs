//! Connectivity check and repair.
//!
//! After the connector runs the graph may split into several components.
//! The repairer joins them one edge at a time:
//!
//! 1. Find components (iterative BFS) and order them by size, largest
//!    first, ties broken by lowest member id.
//! 2. For each component other than the largest, list every pair with one
//!    waypoint inside and one in any other component, sorted by
//!    (distance, inside id, outside id).
//! 3. Walk that list under a growing radius `R * factor^k` (k = 1, 2, ...)
//!    until the radius covers the grid diagonal. The first pair whose
//!    segment is free becomes a repair edge, and step 1 runs again.
//!
//! If no component yields an edge in a full pass the graph is
//! unconnectable.

use std::time::Instant;

use log::{debug, warn};

use crate::grid::OccupancyGrid;

use super::budget::GenerationBudget;
use super::graph::{EdgeKind, WaypointGraph, WaypointId};

/// Where the repairer stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairState {
    /// Connectivity not checked yet.
    Unchecked,
    /// One component.
    Connected,
    /// Several components, repair pending.
    Disconnected {
        /// Current component count
        components: usize,
    },
    /// A full pass found no joinable pair.
    Unconnectable {
        /// Components that remain
        components: usize,
    },
    /// The budget fired.
    TimedOut {
        /// Components at the time it fired
        components: usize,
    },
}

/// Result of a repair run.
#[derive(Clone, Debug)]
pub struct RepairOutcome {
    /// Terminal state (never `Unchecked` or `Disconnected`).
    pub state: RepairState,
    /// Components found before any repair edge was added.
    pub initial_components: usize,
    /// Repair edges added.
    pub added: usize,
    /// Highest relaxation stage that produced an edge (0 if none).
    pub max_stage: u32,
}

/// Joins disconnected components with the shortest free segments available.
pub struct Repairer<'a> {
    grid: &'a OccupancyGrid,
    base_radius: f32,
    factor: f32,
}

impl<'a> Repairer<'a> {
    /// Create a repairer. `base_radius` is the connector radius R and
    /// `factor` the per-stage growth (must be greater than 1).
    pub fn new(grid: &'a OccupancyGrid, base_radius: f32, factor: f32) -> Self {
        Self {
            grid,
            base_radius,
            factor,
        }
    }

    /// Check connectivity, adding repair edges until the graph is one
    /// component or no further edge can be found.
    pub fn repair(&self, graph: &mut WaypointGraph, budget: &GenerationBudget) -> RepairOutcome {
        let start = Instant::now();
        let mut outcome = RepairOutcome {
            state: RepairState::Unchecked,
            initial_components: 0,
            added: 0,
            max_stage: 0,
        };

        loop {
            let components = graph.components();
            if outcome.state == RepairState::Unchecked {
                outcome.initial_components = components.len();
            }
            if components.len() <= 1 {
                outcome.state = RepairState::Connected;
                break;
            }
            outcome.state = RepairState::Disconnected {
                components: components.len(),
            };
            if budget.is_exhausted() {
                outcome.state = RepairState::TimedOut {
                    components: components.len(),
                };
                break;
            }

            match self.find_bridge(graph, components, budget) {
                Bridge::Found { inside, outside, stage } => {
                    graph.add_edge(inside, outside, EdgeKind::Repair);
                    outcome.added += 1;
                    outcome.max_stage = outcome.max_stage.max(stage);
                    debug!("[Repair] Joined {} - {} at stage {}", inside, outside, stage);
                }
                Bridge::Unreachable { components } => {
                    outcome.state = RepairState::Unconnectable { components };
                    warn!(
                        "[Repair] No free segment joins the remaining {} components",
                        components
                    );
                    break;
                }
                Bridge::Interrupted { components } => {
                    outcome.state = RepairState::TimedOut { components };
                    break;
                }
            }
        }

        debug!(
            "[Repair] {:?} after {} repair edges in {:.1}ms",
            outcome.state,
            outcome.added,
            start.elapsed().as_secs_f64() * 1000.0
        );
        outcome
    }

    /// Look for one repair edge, trying the smaller components in order.
    fn find_bridge(
        &self,
        graph: &WaypointGraph,
        mut components: Vec<Vec<WaypointId>>,
        budget: &GenerationBudget,
    ) -> Bridge {
        let count = components.len();
        // Each component is sorted, so the first member is its lowest id
        components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

        let mut component_of = vec![0usize; graph.len()];
        for (c, members) in components.iter().enumerate() {
            for id in members {
                component_of[id.index()] = c;
            }
        }

        let max_radius = self.grid.diagonal();
        for (c, members) in components.iter().enumerate().skip(1) {
            let mut pairs: Vec<(f32, WaypointId, WaypointId)> = Vec::new();
            for &inside in members {
                let p = graph.waypoints()[inside.index()].position;
                for other in graph.waypoints() {
                    if component_of[other.id.index()] != c {
                        pairs.push((p.distance(&other.position), inside, other.id));
                    }
                }
            }
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

            let mut cursor = 0;
            let mut stage = 1u32;
            let mut radius = self.base_radius * self.factor;
            while cursor < pairs.len() {
                if budget.is_exhausted() {
                    return Bridge::Interrupted { components: count };
                }

                let (distance, inside, outside) = pairs[cursor];
                if distance > radius {
                    if radius >= max_radius {
                        // Last stage admits everything left
                        radius = f32::INFINITY;
                    } else {
                        // Jump over stages that would admit nothing
                        let steps = self.stages_to_cover(radius, distance.min(max_radius));
                        stage = stage.saturating_add(steps);
                        radius = grow(radius, self.factor, steps);
                    }
                    continue;
                }

                cursor += 1;
                let a = graph.waypoints()[inside.index()].position;
                let b = graph.waypoints()[outside.index()].position;
                if self.grid.is_line_free(a, b) {
                    return Bridge::Found {
                        inside,
                        outside,
                        stage,
                    };
                }
            }
        }

        Bridge::Unreachable { components: count }
    }

    /// Stages needed for `radius` to grow to at least `target` (at least one).
    fn stages_to_cover(&self, radius: f32, target: f32) -> u32 {
        let steps = ((target as f64 / radius as f64).ln() / (self.factor as f64).ln()).ceil();
        (steps as u32).max(1)
    }
}

#[inline]
fn grow(radius: f32, factor: f32, steps: u32) -> f32 {
    (radius as f64 * (factor as f64).powf(steps as f64)) as f32
}

enum Bridge {
    Found {
        inside: WaypointId,
        outside: WaypointId,
        stage: u32,
    },
    Unreachable {
        components: usize,
    },
    Interrupted {
        components: usize,
    },
}
