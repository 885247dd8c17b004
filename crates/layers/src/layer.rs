use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an overlay for the lifetime of a session.
///
/// Static layers are keyed by their source URL, remotely hosted ones by
/// `ion-<assetId>`. The engine bridge and the visibility table both rely on
/// these strings, so the rule must not change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKey(String);

impl LayerKey {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn for_ion_asset(asset_id: u64) -> Self {
        Self(format!("ion-{asset_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl Borrow<str> for LayerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Where the engine fetches a layer from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSource {
    /// Path relative to the application base URL.
    File(String),
    /// Asset hosted on Cesium ion.
    IonAsset(u64),
}

impl LayerSource {
    /// The URL the engine loads, or `None` for ion assets.
    pub fn resolve_url(&self, base_url: &str) -> Option<String> {
        match self {
            LayerSource::File(path) => Some(join_url(base_url, path)),
            LayerSource::IonAsset(_) => None,
        }
    }

    pub fn key(&self, base_url: &str) -> LayerKey {
        match self {
            LayerSource::File(path) => LayerKey::for_url(join_url(base_url, path)),
            LayerSource::IonAsset(id) => LayerKey::for_ion_asset(*id),
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base_url}{}", &path[1..]),
        (false, false) if !base_url.is_empty() => format!("{base_url}/{path}"),
        _ => format!("{base_url}{path}"),
    }
}

pub trait Layer {
    fn source(&self) -> &LayerSource;
    fn name(&self) -> &str;

    fn key(&self, base_url: &str) -> LayerKey {
        self.source().key(base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerKey, LayerSource};

    #[test]
    fn ion_key_is_prefixed_asset_id() {
        assert_eq!(LayerKey::for_ion_asset(3326798).as_str(), "ion-3326798");
        assert_eq!(
            LayerSource::IonAsset(3326380).key("/BIM-GIS/"),
            LayerKey::for_ion_asset(3326380)
        );
    }

    #[test]
    fn static_key_is_resolved_url() {
        let source = LayerSource::File("data/EjeDrenesPaq3.geojson".to_string());
        assert_eq!(
            source.key("/BIM-GIS/").as_str(),
            "/BIM-GIS/data/EjeDrenesPaq3.geojson"
        );
        assert_eq!(
            source.resolve_url("/BIM-GIS/").as_deref(),
            Some("/BIM-GIS/data/EjeDrenesPaq3.geojson")
        );
        assert_eq!(LayerSource::IonAsset(1).resolve_url("/"), None);
    }

    #[test]
    fn url_join_handles_slashes() {
        let file = |p: &str| LayerSource::File(p.to_string());
        assert_eq!(file("/a.geojson").key("/base/").as_str(), "/base/a.geojson");
        assert_eq!(file("a.geojson").key("/base").as_str(), "/base/a.geojson");
        assert_eq!(file("a.geojson").key("").as_str(), "a.geojson");
    }

    #[test]
    fn source_serializes_as_tagged_variant() {
        let json = serde_json::to_string(&LayerSource::IonAsset(42)).unwrap();
        assert_eq!(json, r#"{"ion_asset":42}"#);
        let back: LayerSource = serde_json::from_str(r#"{"file":"data/x.geojson"}"#).unwrap();
        assert_eq!(back, LayerSource::File("data/x.geojson".to_string()));
    }
}
