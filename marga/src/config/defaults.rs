//! Default value functions for serde deserialization.

pub fn neighbors() -> usize {
    5
}

pub fn min_spacing() -> f32 {
    0.5
}

pub fn connection_radius() -> f32 {
    1.5
}

pub fn max_waypoints() -> usize {
    200
}

pub fn max_consecutive_rejections() -> usize {
    500
}

pub fn relaxation_factor() -> f32 {
    2.0
}
