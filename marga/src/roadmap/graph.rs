//! Waypoint and edge types, and the mutable graph the stages build.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

/// Waypoint handle. Rendered as `wp<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub u32);

impl WaypointId {
    /// Position of this waypoint in id-ordered storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wp{}", self.0)
    }
}

/// A sampled location in free space.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    /// Unique id
    pub id: WaypointId,
    /// World position (meters)
    pub position: WorldPoint,
    /// Ids of waypoints sharing an edge with this one
    pub neighbors: BTreeSet<WaypointId>,
}

impl Waypoint {
    /// Create a waypoint with no neighbors.
    pub fn new(id: WaypointId, position: WorldPoint) -> Self {
        Self {
            id,
            position,
            neighbors: BTreeSet::new(),
        }
    }
}

/// Which stage created an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Added by the K-nearest connector
    Local,
    /// Added by the connectivity repairer
    Repair,
}

/// Undirected edge, stored with the smaller id first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// Smaller endpoint id
    pub a: WaypointId,
    /// Larger endpoint id
    pub b: WaypointId,
    /// Straight-line length (meters)
    pub length: f32,
    /// Creating stage
    pub kind: EdgeKind,
}

impl Edge {
    /// Create an edge, normalizing endpoint order.
    pub fn new(a: WaypointId, b: WaypointId, length: f32, kind: EdgeKind) -> Self {
        let (a, b) = normalize(a, b);
        Self { a, b, length, kind }
    }
}

#[inline]
fn normalize(a: WaypointId, b: WaypointId) -> (WaypointId, WaypointId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Waypoints plus edges, under construction.
///
/// Ids are dense: waypoint `wp<n>` is stored at index `n`. Edge insertion is
/// idempotent and updates both endpoints' neighbor sets in one step, so the
/// graph is consistent between any two calls.
#[derive(Clone, Debug, Default)]
pub struct WaypointGraph {
    waypoints: Vec<Waypoint>,
    edges: Vec<Edge>,
    edge_index: HashSet<(WaypointId, WaypointId)>,
}

impl WaypointGraph {
    /// Create a graph from sampled waypoints.
    ///
    /// Ids must run `wp0, wp1, ...` in order, as the sampler assigns them.
    /// Existing neighbor sets are discarded.
    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        debug_assert!(
            waypoints.iter().enumerate().all(|(i, w)| w.id.index() == i),
            "waypoint ids must be dense and ordered"
        );
        let waypoints = waypoints
            .into_iter()
            .map(|w| Waypoint::new(w.id, w.position))
            .collect();
        Self {
            waypoints,
            edges: Vec::new(),
            edge_index: HashSet::new(),
        }
    }

    /// Create a graph with one waypoint per position, ids assigned in order.
    pub fn from_positions(positions: &[WorldPoint]) -> Self {
        let waypoints = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Waypoint::new(WaypointId(i as u32), *p))
            .collect();
        Self::from_waypoints(waypoints)
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True when there are no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All waypoints, in id order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint by id.
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id.index())
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Is there an edge between `a` and `b` (either order)?
    pub fn has_edge(&self, a: WaypointId, b: WaypointId) -> bool {
        self.edge_index.contains(&normalize(a, b))
    }

    /// Add an edge between two existing, distinct waypoints.
    ///
    /// Returns `false` without changing anything for self-loops, unknown ids
    /// and edges that already exist.
    pub fn add_edge(&mut self, a: WaypointId, b: WaypointId, kind: EdgeKind) -> bool {
        if a == b || a.index() >= self.len() || b.index() >= self.len() {
            return false;
        }
        if !self.edge_index.insert(normalize(a, b)) {
            return false;
        }

        let length = self.waypoints[a.index()]
            .position
            .distance(&self.waypoints[b.index()].position);
        self.edges.push(Edge::new(a, b, length, kind));
        self.waypoints[a.index()].neighbors.insert(b);
        self.waypoints[b.index()].neighbors.insert(a);
        true
    }

    /// Mark every waypoint reachable from `start` (iterative BFS).
    fn reach(&self, start: WaypointId, visited: &mut [bool], out: &mut Vec<WaypointId>) {
        let mut queue = VecDeque::new();
        visited[start.index()] = true;
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            out.push(id);
            for &next in &self.waypoints[id.index()].neighbors {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    /// Does a traversal from the lowest id reach every waypoint?
    ///
    /// An empty graph is not connected; a single waypoint is.
    pub fn is_connected(&self) -> bool {
        if self.waypoints.is_empty() {
            return false;
        }
        let mut visited = vec![false; self.len()];
        let mut reached = Vec::with_capacity(self.len());
        self.reach(WaypointId(0), &mut visited, &mut reached);
        reached.len() == self.len()
    }

    /// Connected components.
    ///
    /// Each component lists its ids in ascending order; components are
    /// ordered by their lowest id.
    pub fn components(&self) -> Vec<Vec<WaypointId>> {
        let mut visited = vec![false; self.len()];
        let mut components = Vec::new();

        for w in &self.waypoints {
            if visited[w.id.index()] {
                continue;
            }
            let mut component = Vec::new();
            self.reach(w.id, &mut visited, &mut component);
            component.sort_unstable();
            components.push(component);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(n: usize) -> WaypointGraph {
        let positions: Vec<_> = (0..n).map(|i| WorldPoint::new(i as f32, 0.0)).collect();
        WaypointGraph::from_positions(&positions)
    }

    #[test]
    fn test_waypoint_id_display() {
        assert_eq!(WaypointId(0).to_string(), "wp0");
        assert_eq!(WaypointId(17).to_string(), "wp17");
    }

    #[test]
    fn test_edge_normalized() {
        let e = Edge::new(WaypointId(5), WaypointId(2), 1.0, EdgeKind::Local);
        assert_eq!(e.a, WaypointId(2));
        assert_eq!(e.b, WaypointId(5));
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut graph = line_of(3);
        assert!(graph.add_edge(WaypointId(0), WaypointId(2), EdgeKind::Local));
        assert!(!graph.add_edge(WaypointId(2), WaypointId(0), EdgeKind::Repair));
        assert!(!graph.add_edge(WaypointId(1), WaypointId(1), EdgeKind::Local));
        assert!(!graph.add_edge(WaypointId(1), WaypointId(9), EdgeKind::Local));

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(WaypointId(2), WaypointId(0)));
        assert!((graph.edges()[0].length - 2.0).abs() < 1e-6);
        assert_eq!(graph.edges()[0].kind, EdgeKind::Local);

        let w0 = graph.waypoint(WaypointId(0)).unwrap();
        assert!(w0.neighbors.contains(&WaypointId(2)));
        let w2 = graph.waypoint(WaypointId(2)).unwrap();
        assert!(w2.neighbors.contains(&WaypointId(0)));
    }

    #[test]
    fn test_components() {
        let mut graph = line_of(5);
        graph.add_edge(WaypointId(0), WaypointId(3), EdgeKind::Local);
        graph.add_edge(WaypointId(3), WaypointId(4), EdgeKind::Local);
        graph.add_edge(WaypointId(1), WaypointId(2), EdgeKind::Local);

        let components = graph.components();
        assert_eq!(
            components,
            vec![
                vec![WaypointId(0), WaypointId(3), WaypointId(4)],
                vec![WaypointId(1), WaypointId(2)],
            ]
        );
        assert!(!graph.is_connected());

        graph.add_edge(WaypointId(4), WaypointId(1), EdgeKind::Repair);
        assert!(graph.is_connected());
        assert_eq!(graph.components().len(), 1);
    }

    #[test]
    fn test_connectivity_edge_cases() {
        assert!(!WaypointGraph::default().is_connected());
        assert!(WaypointGraph::default().components().is_empty());
        assert!(line_of(1).is_connected());
        assert_eq!(line_of(3).components().len(), 3);
    }
}
