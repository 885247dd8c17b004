use scene::{HostConnector, HostError, ModelSelection, ObjectBoundingBox, ViewerApi};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::bridge::{self, js_error_message};

/// Connects to the workspace API through the parent frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceConnector;

/// A live workspace API session.
#[derive(Debug, Clone)]
pub struct WorkspaceViewer {
    api: JsValue,
}

impl HostConnector for WorkspaceConnector {
    type Viewer = WorkspaceViewer;

    async fn connect(&self) -> Result<WorkspaceViewer, HostError> {
        let promise = bridge::bim_connect().map_err(host_error)?;
        let api = JsFuture::from(promise).await.map_err(host_error)?;
        if api.is_undefined() || api.is_null() {
            return Err(HostError::new("workspace API returned no session"));
        }
        Ok(WorkspaceViewer { api })
    }
}

impl ViewerApi for WorkspaceViewer {
    async fn get_selection(&self) -> Result<Vec<ModelSelection>, HostError> {
        let promise = bridge::bim_get_selection(&self.api).map_err(host_error)?;
        decode(JsFuture::from(promise).await.map_err(host_error)?)
    }

    async fn get_object_bounding_boxes(
        &self,
        model_id: &str,
        object_runtime_ids: &[u64],
    ) -> Result<Vec<ObjectBoundingBox>, HostError> {
        let ids = serde_json::to_string(object_runtime_ids)
            .map_err(|e| HostError::new(e.to_string()))?;
        let promise =
            bridge::bim_get_object_bounding_boxes(&self.api, model_id, &ids).map_err(host_error)?;
        decode(JsFuture::from(promise).await.map_err(host_error)?)
    }
}

fn host_error(err: JsValue) -> HostError {
    HostError::new(js_error_message(&err))
}

fn decode<T: DeserializeOwned>(value: JsValue) -> Result<T, HostError> {
    let json = value
        .as_string()
        .ok_or_else(|| HostError::new("host reply was not a JSON string"))?;
    decode_json(&json)
}

fn decode_json<T: DeserializeOwned>(json: &str) -> Result<T, HostError> {
    serde_json::from_str(json).map_err(|e| HostError::new(format!("malformed host reply: {e}")))
}
