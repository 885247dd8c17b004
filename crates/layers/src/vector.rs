use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerSource};
use crate::symbology::{Color, LayerStyle};

/// A GeoJSON overlay draped on the terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
    pub name: String,
    pub source: LayerSource,
    #[serde(default)]
    pub style: LayerStyle,
}

impl VectorLayer {
    pub fn new(name: impl Into<String>, source: LayerSource, color: Color) -> Self {
        Self {
            name: name.into(),
            source,
            style: LayerStyle::uniform(color),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, LayerSource::IonAsset(_))
    }
}

impl Layer for VectorLayer {
    fn source(&self) -> &LayerSource {
        &self.source
    }

    fn name(&self) -> &str {
        &self.name
    }
}
