//! Seam to the hosting BIM platform's workspace API.
//!
//! The host hands back plain JSON; the payload types here deserialize its
//! camelCase field names directly.

use foundation::math::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Failure reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Objects selected in one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSelection {
    pub model_id: String,
    #[serde(default)]
    pub object_runtime_ids: Option<Vec<u64>>,
}

/// Bounding box exactly as the host reports it, before validation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBoundingBox {
    #[serde(deserialize_with = "host_point")]
    pub min: Vec3,
    #[serde(deserialize_with = "host_point")]
    pub max: Vec3,
}

/// The host serializes NaN and infinities as `null`. Those axes, and missing
/// ones, come back as NaN so bounds validation rejects them.
fn host_point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
    #[derive(Deserialize)]
    struct HostPoint {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    }

    let p = HostPoint::deserialize(deserializer)?;
    let axis = |v: Option<f64>| v.unwrap_or(f64::NAN);
    Ok(Vec3::new(axis(p.x), axis(p.y), axis(p.z)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBoundingBox {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub bounding_box: Option<RawBoundingBox>,
}

/// Establishes a session with the host.
#[allow(async_fn_in_trait)]
pub trait HostConnector {
    type Viewer: ViewerApi;

    async fn connect(&self) -> Result<Self::Viewer, HostError>;
}

/// Queries against the host's 3D viewer.
#[allow(async_fn_in_trait)]
pub trait ViewerApi {
    async fn get_selection(&self) -> Result<Vec<ModelSelection>, HostError>;

    async fn get_object_bounding_boxes(
        &self,
        model_id: &str,
        object_runtime_ids: &[u64],
    ) -> Result<Vec<ObjectBoundingBox>, HostError>;
}
