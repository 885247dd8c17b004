use serde::Serialize;
use thiserror::Error;

use crate::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("bounding box has a non-finite corner")]
    NonFinite,
    #[error("bounding box min exceeds max on the {0} axis")]
    Inverted(Axis),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned 3D bounding box in projected meters.
///
/// Invariant: `min <= max` on every axis. Zero-volume boxes are valid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BoundingBox3 {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox3 {
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, BoundsError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BoundsError::NonFinite);
        }
        for (axis, lo, hi) in [
            (Axis::X, min.x, max.x),
            (Axis::Y, min.y, max.y),
            (Axis::Z, min.z, max.z),
        ] {
            if lo > hi {
                return Err(BoundsError::Inverted(axis));
            }
        }
        Ok(Self { min, max })
    }

    /// A zero-volume box around a single point.
    pub fn point(p: Vec3) -> Result<Self, BoundsError> {
        Self::new(p, p)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Midpoint of `min` and `max`. Recomputed on every call.
    pub fn centroid(&self) -> Vec3 {
        self.min.midpoint(self.max)
    }
}
