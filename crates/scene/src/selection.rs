//! Resolves the host's current selection to a bounding box.
//!
//! Selection policy: when objects from several models are selected, only the
//! first model is considered and only the first returned box is used. This
//! mirrors the product's current behavior; generalizing it to all models needs
//! product sign-off first.

use foundation::bounds::BoundingBox3;
use tracing::debug;

use crate::error::SelectionError;
use crate::host::{HostConnector, ViewerApi};

/// Queries the connected viewer for its selection and the first model's box.
///
/// Host calls are issued strictly in sequence: the box query depends on the
/// selection. Nothing is retried.
pub async fn resolve_selection_bounding_box<V: ViewerApi>(
    viewer: &V,
) -> Result<BoundingBox3, SelectionError> {
    let selection = viewer
        .get_selection()
        .await
        .map_err(SelectionError::HostQueryFailure)?;

    let Some(first) = selection.first() else {
        return Err(SelectionError::NoSelection);
    };
    if selection.len() > 1 {
        debug!(
            model_id = %first.model_id,
            ignored_models = selection.len() - 1,
            "multi-model selection, using the first model only"
        );
    }

    let Some(runtime_ids) = first.object_runtime_ids.as_deref() else {
        return Err(SelectionError::IncompleteSelection {
            model_id: first.model_id.clone(),
        });
    };

    let boxes = viewer
        .get_object_bounding_boxes(&first.model_id, runtime_ids)
        .await
        .map_err(SelectionError::HostQueryFailure)?;

    let raw = boxes
        .first()
        .and_then(|b| b.bounding_box)
        .ok_or(SelectionError::NoBoundingBox)?;
    debug!(min = ?raw.min, max = ?raw.max, "bounding box received");

    BoundingBox3::new(raw.min, raw.max).map_err(SelectionError::invalid_coordinate)
}

/// Connects to the host, then resolves its selection.
pub async fn fetch_selection_bounds<C: HostConnector>(
    connector: &C,
) -> Result<BoundingBox3, SelectionError> {
    let viewer = connector
        .connect()
        .await
        .map_err(SelectionError::HostConnectionFailure)?;
    resolve_selection_bounding_box(&viewer).await
}
