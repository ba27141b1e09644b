//! SVG rendering of a roadmap over its grid.

use crate::core::{CellState, GridCoord};
use crate::grid::OccupancyGrid;
use crate::roadmap::{EdgeKind, Roadmap};

/// Render options
#[derive(Clone, Debug)]
pub struct SvgOptions {
    /// Output width in pixels (height follows the map aspect ratio)
    pub width_px: u32,
    /// Draw `wp<n>` labels next to waypoints
    pub labels: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width_px: 800,
            labels: false,
        }
    }
}

/// Export the grid and roadmap to SVG for visualization.
///
/// Occupied cells are black, unknown cells gray, local edges light gray,
/// repair edges orange. World +Y points up.
pub fn render_svg(grid: &OccupancyGrid, roadmap: &Roadmap, options: &SvgOptions) -> String {
    let (min, max) = grid.bounds();
    let res = grid.resolution();
    let margin = res * 2.0;

    let view_min_x = min.x - margin;
    let view_min_y = min.y - margin;
    let view_width = (max.x - min.x) + 2.0 * margin;
    let view_height = (max.y - min.y) + 2.0 * margin;
    let height_px = (options.width_px as f32 * view_height / view_width).round() as u32;

    let mut svg = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">
  <rect x="{}" y="{}" width="{}" height="{}" fill="white"/>
  <g transform="scale(1, -1) translate(0, -{})">
"#,
        view_min_x,
        -view_min_y - view_height,
        view_width,
        view_height,
        options.width_px,
        height_px,
        view_min_x,
        -view_min_y - view_height,
        view_width,
        view_height,
        2.0 * view_min_y + view_height
    );

    // Cells
    svg.push_str("    <!-- Cells -->\n");
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let coord = GridCoord::new(x as i32, y as i32);
            let fill = match grid.cell(coord) {
                Some(CellState::Occupied) => "black",
                Some(CellState::Unknown) => "#bbbbbb",
                _ => continue,
            };
            svg.push_str(&format!(
                "    <rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\"/>\n",
                min.x + x as f32 * res,
                min.y + y as f32 * res,
                res,
                res,
                fill
            ));
        }
    }

    // Edges
    svg.push_str("    <!-- Roadmap Edges -->\n");
    let stroke = res * 0.3;
    for edge in roadmap.edges() {
        let (Some(a), Some(b)) = (roadmap.waypoint(edge.a), roadmap.waypoint(edge.b)) else {
            continue;
        };
        let color = match edge.kind {
            EdgeKind::Local => "#999999",
            EdgeKind::Repair => "orange",
        };
        svg.push_str(&format!(
            "    <line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{:.3}\"/>\n",
            a.position.x, a.position.y, b.position.x, b.position.y, color, stroke
        ));
    }

    // Waypoints
    svg.push_str("    <!-- Waypoints -->\n");
    let radius = res * 0.8;
    for waypoint in roadmap.waypoints() {
        svg.push_str(&format!(
            "    <circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\" fill=\"steelblue\"/>\n",
            waypoint.position.x, waypoint.position.y, radius
        ));
        if options.labels {
            // Undo the outer flip so text reads upright
            svg.push_str(&format!(
                "    <text x=\"{:.3}\" y=\"{:.3}\" font-size=\"{:.3}\" transform=\"scale(1, -1)\">{}</text>\n",
                waypoint.position.x + radius,
                -waypoint.position.y,
                res * 2.0,
                waypoint.id
            ));
        }
    }

    svg.push_str("  </g>\n</svg>\n");
    svg
}
