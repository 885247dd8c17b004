use foundation::bounds::BoundingBox3;
use foundation::math::{CoordinateTransform, Crs, CrsError, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraOrientation, DEFAULT_HEADING_DEG, DEFAULT_PITCH_DEG, FlyTo, GeographicTarget};
use crate::error::SelectionError;

/// Projected system the host reports coordinates in.
pub const DEFAULT_SOURCE_CRS: &str = "+proj=utm +zone=17 +south +datum=WGS84 +units=m +no_defs";
/// Geographic system the camera is driven in.
pub const DEFAULT_TARGET_CRS: &str = "+proj=longlat +datum=WGS84 +no_defs";
/// Meters above the selection the camera is placed at.
pub const DEFAULT_VERTICAL_OFFSET_M: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub source_crs: String,
    pub target_crs: String,
    pub vertical_offset_m: f64,
    pub heading_deg: f64,
    pub pitch_deg: f64,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            source_crs: DEFAULT_SOURCE_CRS.to_string(),
            target_crs: DEFAULT_TARGET_CRS.to_string(),
            vertical_offset_m: DEFAULT_VERTICAL_OFFSET_M,
            heading_deg: DEFAULT_HEADING_DEG,
            pitch_deg: DEFAULT_PITCH_DEG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectorConfigError {
    #[error("source_crs: {0}")]
    SourceCrs(#[source] CrsError),
    #[error("target_crs: {0}")]
    TargetCrs(#[source] CrsError),
    #[error("target_crs must be geographic, got `{0}`")]
    TargetNotGeographic(Crs),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Turns a selection's bounding box into a camera framing command.
///
/// Pure: the projector never touches the camera itself.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetProjector {
    transform: CoordinateTransform,
    vertical_offset_m: f64,
    orientation: CameraOrientation,
}

impl TargetProjector {
    pub fn new(
        transform: CoordinateTransform,
        vertical_offset_m: f64,
        orientation: CameraOrientation,
    ) -> Self {
        Self {
            transform,
            vertical_offset_m,
            orientation,
        }
    }

    pub fn from_config(config: &ProjectorConfig) -> Result<Self, ProjectorConfigError> {
        let source: Crs = config
            .source_crs
            .parse()
            .map_err(ProjectorConfigError::SourceCrs)?;
        let target: Crs = config
            .target_crs
            .parse()
            .map_err(ProjectorConfigError::TargetCrs)?;
        if !target.is_geographic() {
            return Err(ProjectorConfigError::TargetNotGeographic(target));
        }
        for (field, value) in [
            ("vertical_offset_m", config.vertical_offset_m),
            ("heading_deg", config.heading_deg),
            ("pitch_deg", config.pitch_deg),
        ] {
            if !value.is_finite() {
                return Err(ProjectorConfigError::NonFinite { field, value });
            }
        }

        Ok(Self::new(
            CoordinateTransform::new(source, target),
            config.vertical_offset_m,
            CameraOrientation::from_degrees(config.heading_deg, config.pitch_deg),
        ))
    }

    pub fn with_vertical_offset(mut self, vertical_offset_m: f64) -> Self {
        self.vertical_offset_m = vertical_offset_m;
        self
    }

    pub fn vertical_offset_m(&self) -> f64 {
        self.vertical_offset_m
    }

    pub fn orientation(&self) -> CameraOrientation {
        self.orientation
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn project(&self, bounds: &BoundingBox3) -> Result<GeographicTarget, SelectionError> {
        self.project_point(bounds.centroid())
    }

    /// Projects an already reduced point (e.g. a box centroid).
    pub fn project_point(&self, centroid: Vec3) -> Result<GeographicTarget, SelectionError> {
        if !centroid.is_finite() {
            return Err(SelectionError::invalid_coordinate(format!(
                "centroid ({}, {}, {}) is not finite",
                centroid.x, centroid.y, centroid.z
            )));
        }
        let height_m = centroid.z + self.vertical_offset_m;
        if !height_m.is_finite() {
            return Err(SelectionError::invalid_coordinate(format!(
                "camera height {height_m} is not finite"
            )));
        }

        let geographic = self
            .transform
            .transform(centroid.horizontal())
            .map_err(SelectionError::invalid_coordinate)?;

        Ok(GeographicTarget::new(geographic.x, geographic.y, height_m))
    }

    pub fn fly_to(&self, bounds: &BoundingBox3) -> Result<FlyTo, SelectionError> {
        let target = self.project(bounds)?;
        Ok(FlyTo::new(target, self.orientation))
    }
}
