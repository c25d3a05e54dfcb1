//! Plane trigonometry shared by both shading models. Angles are in degrees.

/// Angle above the horizon, seen from the array, of an obstacle top.
///
/// `distance` must be strictly positive.
pub fn obstacle_angle(height: f64, distance: f64) -> f64 {
    height.atan2(distance).to_degrees()
}

/// Horizontal length of the shadow cast by an object of `height` metres.
///
/// `elevation_deg` must lie in (0°, 90°).
pub fn shadow_length(height: f64, elevation_deg: f64) -> f64 {
    height / elevation_deg.to_radians().tan()
}

/// Height gained by a roof slope of `pitch_deg` over a horizontal `run`.
pub fn rise_over_run(pitch_deg: f64, run: f64) -> f64 {
    pitch_deg.to_radians().tan() * run
}
