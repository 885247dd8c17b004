use std::collections::HashMap;

use layers::{ImageryLayer, LayerKey, LayerSink, LayerSource, VectorLayer};
use scene::{CameraSink, FlyTo};
use tracing::{debug, error};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::bridge::{self, js_error_message};
use crate::config::ViewerConfig;

/// The Cesium viewer plus the engine handles of every loaded overlay.
#[derive(Debug)]
pub struct CesiumEngine {
    viewer: JsValue,
    handles: HashMap<LayerKey, JsValue>,
}

impl CesiumEngine {
    pub fn create(config: &ViewerConfig) -> Result<Self, JsValue> {
        let viewer = bridge::engine_create_viewer(
            &config.container_id,
            config.ion_token().map(str::to_string),
            config.terrain().is_world(),
        )?;
        Ok(Self {
            viewer,
            handles: HashMap::new(),
        })
    }

    pub fn viewer(&self) -> &JsValue {
        &self.viewer
    }

    pub fn attach(&mut self, key: LayerKey, handle: JsValue) {
        self.handles.insert(key, handle);
    }

    pub fn is_loaded(&self, key: &LayerKey) -> bool {
        self.handles.contains_key(key)
    }
}

impl CameraSink for CesiumEngine {
    fn fly_to(&mut self, command: &FlyTo) {
        let d = command.destination;
        let o = command.orientation;
        if let Err(err) = bridge::engine_fly_to(
            &self.viewer,
            d.x,
            d.y,
            d.z,
            o.heading_rad,
            o.pitch_rad,
            o.roll_rad,
        ) {
            error!("camera flyTo failed: {}", js_error_message(&err));
        }
    }
}

impl LayerSink for CesiumEngine {
    fn set_layer_shown(&mut self, key: &LayerKey, shown: bool) {
        let Some(handle) = self.handles.get(key) else {
            // Applied once the layer finishes loading.
            debug!(%key, shown, "layer not loaded yet");
            return;
        };
        if let Err(err) = bridge::engine_set_shown(handle, shown) {
            error!(%key, "could not toggle layer: {}", js_error_message(&err));
        }
    }
}

/// Loads a GeoJSON overlay and adds it to the viewer.
pub async fn load_vector(
    viewer: &JsValue,
    layer: &VectorLayer,
    base_url: &str,
) -> Result<JsValue, JsValue> {
    let style = layer.style;
    let stroke = style.stroke.to_css();
    let fill = style.fill.to_css();
    let width = f64::from(style.stroke_width);

    let promise = match &layer.source {
        LayerSource::File(_) => {
            let url = layer
                .source
                .resolve_url(base_url)
                .ok_or_else(|| JsValue::from_str("layer has no URL"))?;
            bridge::engine_load_geojson_url(
                viewer,
                &url,
                &stroke,
                &fill,
                width,
                style.clamp_to_ground,
            )?
        }
        LayerSource::IonAsset(id) => bridge::engine_load_geojson_ion(
            viewer,
            *id as f64,
            &stroke,
            &fill,
            width,
            style.clamp_to_ground,
        )?,
    };
    JsFuture::from(promise).await
}

/// Adds an imagery layer on top of the base imagery.
pub async fn load_imagery(viewer: &JsValue, layer: &ImageryLayer) -> Result<JsValue, JsValue> {
    let LayerSource::IonAsset(id) = layer.source else {
        return Err(JsValue::from_str(&format!(
            "imagery layer `{}` must be an ion asset",
            layer.name
        )));
    };
    let promise = bridge::engine_add_ion_imagery(viewer, id as f64)?;
    JsFuture::from(promise).await
}
