use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerSource};

/// Imagery draped over the globe (e.g. an orthophoto mosaic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryLayer {
    pub name: String,
    pub source: LayerSource,
}

impl ImageryLayer {
    pub fn ion(name: impl Into<String>, asset_id: u64) -> Self {
        Self {
            name: name.into(),
            source: LayerSource::IonAsset(asset_id),
        }
    }
}

impl Layer for ImageryLayer {
    fn source(&self) -> &LayerSource {
        &self.source
    }

    fn name(&self) -> &str {
        &self.name
    }
}
