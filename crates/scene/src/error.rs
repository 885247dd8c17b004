use thiserror::Error;

use crate::host::HostError;

/// Why a fetch-selection action did not move the camera.
///
/// None of these are fatal: the action is abandoned, reported, and may be
/// triggered again by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("nothing is selected in the host viewer")]
    NoSelection,
    #[error("selection in model `{model_id}` carries no object runtime ids")]
    IncompleteSelection { model_id: String },
    #[error("host returned no bounding box for the selection")]
    NoBoundingBox,
    #[error("invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },
    #[error("could not connect to the host: {0}")]
    HostConnectionFailure(#[source] HostError),
    #[error("host request failed: {0}")]
    HostQueryFailure(#[source] HostError),
}

impl SelectionError {
    pub fn invalid_coordinate(reason: impl ToString) -> Self {
        SelectionError::InvalidCoordinate {
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable name, used as the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SelectionError::NoSelection => "no_selection",
            SelectionError::IncompleteSelection { .. } => "incomplete_selection",
            SelectionError::NoBoundingBox => "no_bounding_box",
            SelectionError::InvalidCoordinate { .. } => "invalid_coordinate",
            SelectionError::HostConnectionFailure(_) => "host_connection_failure",
            SelectionError::HostQueryFailure(_) => "host_query_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionError;
    use crate::host::HostError;

    #[test]
    fn messages_name_the_failure() {
        let err = SelectionError::IncompleteSelection {
            model_id: "m-7".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "selection in model `m-7` carries no object runtime ids"
        );
        let err = SelectionError::HostConnectionFailure(HostError::new("timeout"));
        assert_eq!(err.to_string(), "could not connect to the host: timeout");
        assert_eq!(err.kind(), "host_connection_failure");
    }
}
