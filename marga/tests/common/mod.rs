//! Test utilities for marga integration tests.
//!
//! Grid builders for the standard scenarios and graph property checks.

#![allow(dead_code)]

use std::collections::VecDeque;

use marga::{OccupancyGrid, Roadmap, WaypointId, WorldPoint};

/// Route library logs through the test harness (`RUST_LOG=debug cargo test`).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fully free square grid with 1 m cells.
pub fn open_grid(size: usize) -> OccupancyGrid {
    let row = ".".repeat(size);
    let rows: Vec<&str> = (0..size).map(|_| row.as_str()).collect();
    OccupancyGrid::from_rows(&rows, 1.0, WorldPoint::ZERO).unwrap()
}

/// 10x10 grid split by a horizontal wall at y = 5.
///
/// With `gap = Some(x)` the wall has a single free cell at column `x`.
pub fn walled_grid(gap: Option<usize>) -> OccupancyGrid {
    let open = "..........".to_string();
    let mut wall: Vec<char> = "##########".chars().collect();
    if let Some(x) = gap {
        wall[x] = '.';
    }
    let wall: String = wall.into_iter().collect();

    // First row is the top (y = 9); the wall is row 4 from the top
    let rows: Vec<&str> = (0..10)
        .map(|i| if i == 4 { wall.as_str() } else { open.as_str() })
        .collect();
    OccupancyGrid::from_rows(&rows, 1.0, WorldPoint::ZERO).unwrap()
}

/// Waypoints reachable from `start` following neighbor sets.
pub fn reachable_from(roadmap: &Roadmap, start: WaypointId) -> usize {
    let mut visited = vec![false; roadmap.len()];
    let mut queue = VecDeque::from([start]);
    visited[start.index()] = true;
    let mut count = 0;

    while let Some(id) = queue.pop_front() {
        count += 1;
        for next in roadmap.neighbors(id) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    count
}

/// Every edge stays in free space on `grid`.
pub fn assert_edges_free(roadmap: &Roadmap, grid: &OccupancyGrid) {
    for edge in roadmap.edges() {
        let a = roadmap.waypoint(edge.a).unwrap().position;
        let b = roadmap.waypoint(edge.b).unwrap().position;
        assert!(
            grid.is_line_free(a, b),
            "edge {}-{} crosses an obstacle",
            edge.a,
            edge.b
        );
    }
}

/// Every pair of waypoints is at least `spacing` apart.
pub fn assert_min_spacing(roadmap: &Roadmap, spacing: f32) {
    let waypoints = roadmap.waypoints();
    for (i, a) in waypoints.iter().enumerate() {
        for b in &waypoints[i + 1..] {
            let d = a.position.distance(&b.position);
            assert!(d >= spacing, "{} and {} are {:.3} apart", a.id, b.id, d);
        }
    }
}
