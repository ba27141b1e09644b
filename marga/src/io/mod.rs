//! Map files in, pictures out.
//!
//! - [`load_map`]: ROS map_server YAML + PGM/PNG image into an
//!   [`OccupancyGrid`](crate::grid::OccupancyGrid)
//! - [`render_svg`]: roadmap drawn over its grid

mod map_loader;
mod svg;

pub use map_loader::{MapMetadata, grid_from_image, load_map};
pub use svg::{SvgOptions, render_svg};
