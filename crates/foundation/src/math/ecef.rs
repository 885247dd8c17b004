use serde::Serialize;

/// Earth-centered, Earth-fixed Cartesian position on WGS84 (meters).
///
/// This is the frame the 3D engine positions its camera in.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
