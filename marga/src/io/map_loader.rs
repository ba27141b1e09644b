//! Map loader for ROS map_server YAML + image maps.

use std::path::Path;

use image::GrayImage;
use log::info;
use serde::Deserialize;

use crate::config::MapSection;
use crate::core::{CellState, WorldPoint};
use crate::error::{Result, RoadmapError};
use crate::grid::OccupancyGrid;

/// Map metadata from YAML file (ROS standard format)
#[derive(Debug, Deserialize)]
pub struct MapMetadata {
    /// Image filename (relative to YAML file)
    pub image: String,

    /// Map resolution in meters per pixel
    pub resolution: f32,

    /// Origin of map [x, y, yaw] - world coordinates of bottom-left pixel
    pub origin: [f32; 3],

    /// Non-zero when white means occupied
    #[serde(default)]
    pub negate: i32,

    /// Occupancy probability above which a pixel is occupied
    #[serde(default = "default_occupied_thresh")]
    pub occupied_thresh: f32,

    /// Occupancy probability below which a pixel is free
    #[serde(default = "default_free_thresh")]
    pub free_thresh: f32,
}

fn default_occupied_thresh() -> f32 {
    0.65
}

fn default_free_thresh() -> f32 {
    0.196
}

/// Load a grid from a map_server YAML file and the image it names.
///
/// `overrides` replaces the thresholds from the YAML when set.
pub fn load_map<P: AsRef<Path>>(yaml_path: P, overrides: &MapSection) -> Result<OccupancyGrid> {
    let yaml_path = yaml_path.as_ref();

    let yaml_content = std::fs::read_to_string(yaml_path)?;
    let mut metadata: MapMetadata = serde_yaml::from_str(&yaml_content)?;
    if let Some(thresh) = overrides.occupied_thresh {
        metadata.occupied_thresh = thresh;
    }
    if let Some(thresh) = overrides.free_thresh {
        metadata.free_thresh = thresh;
    }

    let yaml_dir = yaml_path.parent().unwrap_or(Path::new("."));
    let image_path = yaml_dir.join(&metadata.image);
    let pixels = image::open(&image_path)
        .map_err(|e| {
            RoadmapError::MapLoad(format!(
                "Failed to load map image {}: {}",
                image_path.display(),
                e
            ))
        })?
        .into_luma8();

    let grid = grid_from_image(&pixels, &metadata)?;
    let counts = grid.cell_counts();
    info!(
        "[MapLoader] Loaded {} ({}x{} @ {}m): {} free, {} occupied, {} unknown",
        yaml_path.display(),
        grid.width(),
        grid.height(),
        grid.resolution(),
        counts.free,
        counts.occupied,
        counts.unknown
    );
    Ok(grid)
}

/// Classify every pixel with the map_server trinary rule.
///
/// Image row 0 is the top of the map, grid row 0 the bottom.
pub fn grid_from_image(pixels: &GrayImage, metadata: &MapMetadata) -> Result<OccupancyGrid> {
    if metadata.free_thresh > metadata.occupied_thresh {
        return Err(RoadmapError::MapLoad(format!(
            "free_thresh {} exceeds occupied_thresh {}",
            metadata.free_thresh, metadata.occupied_thresh
        )));
    }

    let (width, height) = (pixels.width() as usize, pixels.height() as usize);
    let mut cells = vec![CellState::Unknown; width * height];

    for (px, py, pixel) in pixels.enumerate_pixels() {
        let value = pixel.0[0] as f32 / 255.0;
        let occupancy = if metadata.negate != 0 {
            value
        } else {
            1.0 - value
        };
        let state = if occupancy > metadata.occupied_thresh {
            CellState::Occupied
        } else if occupancy < metadata.free_thresh {
            CellState::Free
        } else {
            CellState::Unknown
        };
        let y = height - 1 - py as usize;
        cells[y * width + px as usize] = state;
    }

    OccupancyGrid::new(
        width,
        height,
        metadata.resolution,
        WorldPoint::new(metadata.origin[0], metadata.origin[1]),
        cells,
    )
}
