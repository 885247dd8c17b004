use serde::{Deserialize, Serialize};

/// Planar coordinate pair: easting/northing in meters, or longitude/latitude
/// in degrees, depending on the system it belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in a projected, meter-based space.
///
/// Host payloads serialize points as `{ "x": .., "y": .., "z": .. }`, which
/// maps onto this type directly.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Componentwise `(a + b) / 2`.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    /// Drops the vertical component.
    pub fn horizontal(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
