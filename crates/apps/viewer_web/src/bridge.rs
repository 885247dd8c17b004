//! JS glue for the host workspace API and the Cesium engine.
//!
//! Host payloads cross the boundary as JSON strings and are decoded with
//! serde on the Rust side. Engine objects stay opaque `JsValue` handles.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
import * as WorkspaceAPI from 'trimble-connect-workspace-api';
import * as Cesium from 'cesium';

export async function bim_connect() {
    return await WorkspaceAPI.connect(window.parent, (_event, _data) => {});
}

export async function bim_get_selection(api) {
    const selection = await api.viewer.getSelection();
    return JSON.stringify(selection ?? []);
}

export async function bim_get_object_bounding_boxes(api, modelId, runtimeIdsJson) {
    const ids = JSON.parse(runtimeIdsJson);
    const boxes = await api.viewer.getObjectBoundingBoxes(modelId, ids);
    return JSON.stringify(boxes ?? []);
}

export function engine_create_viewer(containerId, ionToken, worldTerrain) {
    if (ionToken) {
        Cesium.Ion.defaultAccessToken = ionToken;
    }
    const options = {};
    if (worldTerrain) {
        options.terrain = Cesium.Terrain.fromWorldTerrain();
    }
    return new Cesium.Viewer(containerId, options);
}

function geojson_options(stroke, fill, strokeWidth, clampToGround) {
    return {
        stroke: Cesium.Color.fromCssColorString(stroke),
        fill: Cesium.Color.fromCssColorString(fill),
        strokeWidth,
        clampToGround,
    };
}

export async function engine_load_geojson_url(viewer, url, stroke, fill, strokeWidth, clampToGround) {
    const ds = await Cesium.GeoJsonDataSource.load(
        url,
        geojson_options(stroke, fill, strokeWidth, clampToGround),
    );
    await viewer.dataSources.add(ds);
    return ds;
}

export async function engine_load_geojson_ion(viewer, assetId, stroke, fill, strokeWidth, clampToGround) {
    const resource = await Cesium.IonResource.fromAssetId(assetId);
    const ds = await Cesium.GeoJsonDataSource.load(
        resource,
        geojson_options(stroke, fill, strokeWidth, clampToGround),
    );
    await viewer.dataSources.add(ds);
    return ds;
}

export async function engine_add_ion_imagery(viewer, assetId) {
    const provider = await Cesium.IonImageryProvider.fromAssetId(assetId);
    return viewer.imageryLayers.addImageryProvider(provider);
}

export function engine_set_shown(handle, shown) {
    handle.show = shown;
}

export function engine_fly_to(viewer, x, y, z, heading, pitch, roll) {
    viewer.camera.flyTo({
        destination: new Cesium.Cartesian3(x, y, z),
        orientation: { heading, pitch, roll },
    });
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    pub fn bim_connect() -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn bim_get_selection(api: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn bim_get_object_bounding_boxes(
        api: &JsValue,
        model_id: &str,
        runtime_ids_json: &str,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_create_viewer(
        container_id: &str,
        ion_token: Option<String>,
        world_terrain: bool,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_load_geojson_url(
        viewer: &JsValue,
        url: &str,
        stroke: &str,
        fill: &str,
        stroke_width: f64,
        clamp_to_ground: bool,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_load_geojson_ion(
        viewer: &JsValue,
        asset_id: f64,
        stroke: &str,
        fill: &str,
        stroke_width: f64,
        clamp_to_ground: bool,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_add_ion_imagery(viewer: &JsValue, asset_id: f64) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_set_shown(handle: &JsValue, shown: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub fn engine_fly_to(
        viewer: &JsValue,
        x: f64,
        y: f64,
        z: f64,
        heading: f64,
        pitch: f64,
        roll: f64,
    ) -> Result<(), JsValue>;
}

/// Best-effort message for a thrown JS value.
pub fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{err:?}")
}
