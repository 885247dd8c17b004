//! The overlay set loaded into the viewer at start-up.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layer::{Layer, LayerKey, LayerSource};
use crate::raster::ImageryLayer;
use crate::symbology::{Color, ION_LAYER_ALPHA, STATIC_LAYER_ALPHA};
use crate::vector::VectorLayer;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("layer key `{0}` is used by more than one layer")]
    DuplicateKey(LayerKey),
    #[error("layer `{0}` has an empty source path")]
    EmptySource(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerCatalog {
    pub vector: Vec<VectorLayer>,
    pub imagery: Vec<ImageryLayer>,
}

impl LayerCatalog {
    /// Drainage works for package 3: local collector/drain/tank/structure
    /// files, their ion-hosted counterparts and the orthophoto.
    pub fn drainage_default() -> Self {
        let file = |name: &str| LayerSource::File(format!("data/{name}.geojson"));
        let local = |c: Color| c.with_alpha(STATIC_LAYER_ALPHA);
        let remote = |c: Color| c.with_alpha(ION_LAYER_ALPHA);

        Self {
            vector: vec![
                VectorLayer::new(
                    "Colectores PQ3",
                    file("ColectoresTr10Paquete03"),
                    local(Color::YELLOW),
                ),
                VectorLayer::new(
                    "Eje Drenes Paquete 3",
                    file("EjeDrenesPaq3"),
                    local(Color::CYAN),
                ),
                VectorLayer::new("TRAP200", file("TanquesRetencion"), local(Color::RED)),
                VectorLayer::new(
                    "Estructuras especiales",
                    file("EstructurasDrenPaq3"),
                    local(Color::GREEN),
                ),
                VectorLayer::new(
                    "Colectores - Cesium Ion",
                    LayerSource::IonAsset(3326798),
                    remote(Color::YELLOW),
                ),
                VectorLayer::new(
                    "Estructuras Especiales - Cesium Ion",
                    LayerSource::IonAsset(3326980),
                    remote(Color::RED),
                ),
                VectorLayer::new(
                    "Eje Dren - Cesium Ion",
                    LayerSource::IonAsset(3326983),
                    remote(Color::RED),
                ),
            ],
            imagery: vec![ImageryLayer::ion("Ortofoto (Cesium Ion)", 3326380)],
        }
    }

    pub fn len(&self) -> usize {
        self.vector.len() + self.imagery.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(key, display name)` for every layer, vector layers first.
    pub fn keys(&self, base_url: &str) -> Vec<(LayerKey, String)> {
        self.vector
            .iter()
            .map(|l| (l.key(base_url), l.name.clone()))
            .chain(
                self.imagery
                    .iter()
                    .map(|l| (l.key(base_url), l.name.clone())),
            )
            .collect()
    }

    /// Whether some layer resolves to `key` under `base_url`.
    pub fn contains_key(&self, base_url: &str, key: &str) -> bool {
        self.vector
            .iter()
            .map(|l| l.key(base_url))
            .chain(self.imagery.iter().map(|l| l.key(base_url)))
            .any(|k| k.as_str() == key)
    }

    /// Every layer needs a non-empty source and a key no other layer uses.
    pub fn validate(&self, base_url: &str) -> Result<(), CatalogError> {
        let sources = self
            .vector
            .iter()
            .map(|l| (l.name(), l.source()))
            .chain(self.imagery.iter().map(|l| (l.name(), l.source())));
        let mut seen = BTreeSet::new();
        for (name, source) in sources {
            if matches!(source, LayerSource::File(p) if p.trim().is_empty()) {
                return Err(CatalogError::EmptySource(name.to_string()));
            }
            let key = source.key(base_url);
            if !seen.insert(key.clone()) {
                return Err(CatalogError::DuplicateKey(key));
            }
        }
        Ok(())
    }
}
