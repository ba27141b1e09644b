//! The finished roadmap.

use std::fmt;
use std::time::Duration;

use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

use super::graph::{Edge, Waypoint, WaypointGraph, WaypointId};

type IndexedWaypoint = GeomWithData<[f32; 2], WaypointId>;

/// How a generation pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityStatus {
    /// Every waypoint reaches every other.
    Connected,
    /// Repair could not join the graph.
    Unconnectable {
        /// Components that remain
        components: usize,
    },
    /// The budget fired first.
    TimedOut {
        /// Components at the time it fired
        components: usize,
    },
}

impl ConnectivityStatus {
    /// True only for [`ConnectivityStatus::Connected`].
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectivityStatus::Connected)
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityStatus::Connected => write!(f, "connected"),
            ConnectivityStatus::Unconnectable { components } => {
                write!(f, "unconnectable ({} components)", components)
            }
            ConnectivityStatus::TimedOut { components } => {
                write!(f, "timed out ({} components)", components)
            }
        }
    }
}

/// Counters collected while building a roadmap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Waypoints accepted by the sampler
    pub sampled: usize,
    /// Draws rejected for being too close to an accepted waypoint
    pub rejected_samples: usize,
    /// Edges added by the connector
    pub local_edges: usize,
    /// Candidate edges the connector dropped because the segment was blocked
    pub blocked_candidates: usize,
    /// Components after the connector ran
    pub components_before_repair: usize,
    /// Edges added by the repairer
    pub repair_edges: usize,
    /// Highest relaxation stage the repairer needed (0 if none)
    pub max_relaxation_stage: u32,
    /// Wall-clock time of the whole pass
    pub elapsed: Duration,
}

/// Flat waypoint export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    /// Waypoint name (`wp<n>`)
    pub id: String,
    /// X coordinate (meters)
    pub x: f32,
    /// Y coordinate (meters)
    pub y: f32,
}

/// Flat edge export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Name of the lower-id endpoint
    pub a: String,
    /// Name of the higher-id endpoint
    pub b: String,
}

/// Named waypoints, edges and the connectivity outcome of one generation
/// pass. Read-only: regenerate to get a new roadmap.
#[derive(Clone)]
pub struct Roadmap {
    graph: WaypointGraph,
    status: ConnectivityStatus,
    stats: GenerationStats,
    index: RTree<IndexedWaypoint>,
}

impl Roadmap {
    pub(crate) fn new(
        graph: WaypointGraph,
        status: ConnectivityStatus,
        stats: GenerationStats,
    ) -> Self {
        let indexed = graph
            .waypoints()
            .iter()
            .map(|w| IndexedWaypoint::new(w.position.to_array(), w.id))
            .collect();
        Self {
            graph,
            status,
            stats,
            index: RTree::bulk_load(indexed),
        }
    }

    /// All waypoints, in id order.
    pub fn waypoints(&self) -> &[Waypoint] {
        self.graph.waypoints()
    }

    /// Waypoint by id.
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.graph.waypoint(id)
    }

    /// All edges.
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Neighbor ids of a waypoint, ascending. Empty for unknown ids.
    pub fn neighbors(&self, id: WaypointId) -> impl Iterator<Item = WaypointId> + '_ {
        self.graph
            .waypoint(id)
            .into_iter()
            .flat_map(|w| w.neighbors.iter().copied())
    }

    /// Terminal status of the generation pass.
    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    /// Is the roadmap one connected component?
    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// True when there are no waypoints.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connected components (see [`WaypointGraph::components`]).
    pub fn components(&self) -> Vec<Vec<WaypointId>> {
        self.graph.components()
    }

    /// Waypoint closest to a world point.
    pub fn nearest_waypoint(&self, point: WorldPoint) -> Option<&Waypoint> {
        self.index
            .nearest_neighbor(&point.to_array())
            .and_then(|hit| self.graph.waypoint(hit.data))
    }

    /// Generation counters.
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Waypoints as `{id, x, y}` records.
    pub fn waypoint_list(&self) -> Vec<WaypointRecord> {
        self.waypoints()
            .iter()
            .map(|w| WaypointRecord {
                id: w.id.to_string(),
                x: w.position.x,
                y: w.position.y,
            })
            .collect()
    }

    /// Edges as `{a, b}` records.
    pub fn edge_list(&self) -> Vec<EdgeRecord> {
        self.edges()
            .iter()
            .map(|e| EdgeRecord {
                a: e.a.to_string(),
                b: e.b.to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for Roadmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roadmap")
            .field("waypoints", &self.len())
            .field("edges", &self.edge_count())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::EdgeKind;

    fn triangle() -> Roadmap {
        let mut graph = WaypointGraph::from_positions(&[
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(2.0, 0.0),
            WorldPoint::new(0.0, 2.0),
        ]);
        graph.add_edge(WaypointId(0), WaypointId(1), EdgeKind::Local);
        graph.add_edge(WaypointId(2), WaypointId(0), EdgeKind::Local);
        Roadmap::new(graph, ConnectivityStatus::Connected, GenerationStats::default())
    }

    #[test]
    fn test_accessors() {
        let roadmap = triangle();
        assert_eq!(roadmap.len(), 3);
        assert_eq!(roadmap.edge_count(), 2);
        assert!(roadmap.is_connected());
        assert_eq!(
            roadmap.neighbors(WaypointId(0)).collect::<Vec<_>>(),
            vec![WaypointId(1), WaypointId(2)]
        );
        assert_eq!(roadmap.neighbors(WaypointId(42)).count(), 0);
        assert_eq!(roadmap.components().len(), 1);
    }

    #[test]
    fn test_nearest_waypoint() {
        let roadmap = triangle();
        let hit = roadmap.nearest_waypoint(WorldPoint::new(1.8, 0.3)).unwrap();
        assert_eq!(hit.id, WaypointId(1));

        let empty = Roadmap::new(
            WaypointGraph::default(),
            ConnectivityStatus::TimedOut { components: 0 },
            GenerationStats::default(),
        );
        assert!(empty.nearest_waypoint(WorldPoint::ZERO).is_none());
    }

    #[test]
    fn test_exports() {
        let roadmap = triangle();
        let waypoints = roadmap.waypoint_list();
        assert_eq!(waypoints[1].id, "wp1");
        assert_eq!(waypoints[1].x, 2.0);

        let edges = roadmap.edge_list();
        assert_eq!(
            edges[1],
            EdgeRecord {
                a: "wp0".into(),
                b: "wp2".into()
            }
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ConnectivityStatus::Connected.to_string(), "connected");
        assert_eq!(
            ConnectivityStatus::Unconnectable { components: 2 }.to_string(),
            "unconnectable (2 components)"
        );
    }
}
