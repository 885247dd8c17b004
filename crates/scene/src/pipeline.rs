use std::cell::RefCell;

use runtime::{Event, EventBus, RequestSequencer, RequestToken};
use tracing::{debug, info, warn};

use crate::camera::{CameraSink, FlyTo};
use crate::error::SelectionError;
use crate::host::HostConnector;
use crate::selection::fetch_selection_bounds;
use crate::target::TargetProjector;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The camera was sent to the selection.
    Applied(FlyTo),
    /// A newer request was issued while this one was in flight; its result was dropped.
    Superseded(RequestToken),
}

/// Host selection → bounding box → camera target.
///
/// Overlapping triggers are ordered by request token: only the most recently
/// issued request may move the camera.
#[derive(Debug)]
pub struct SelectionPipeline {
    projector: TargetProjector,
    sequencer: RequestSequencer,
    events: RefCell<EventBus>,
}

impl SelectionPipeline {
    pub fn new(projector: TargetProjector) -> Self {
        Self {
            projector,
            sequencer: RequestSequencer::new(),
            events: RefCell::new(EventBus::new()),
        }
    }

    pub fn projector(&self) -> &TargetProjector {
        &self.projector
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    pub fn recent_events(&self) -> Vec<Event> {
        self.events.borrow().events().cloned().collect()
    }

    /// Runs one fetch-selection action.
    ///
    /// On failure the camera is left untouched and the error is logged,
    /// recorded and returned. Nothing is retried.
    pub async fn run<C, S>(
        &self,
        connector: &C,
        camera: &RefCell<S>,
    ) -> Result<PipelineOutcome, SelectionError>
    where
        C: HostConnector,
        S: CameraSink,
    {
        let token = self.sequencer.issue();
        debug!(%token, "resolving host selection");

        let command = match self.resolve(connector).await {
            Ok(command) => command,
            Err(err) => {
                warn!(%token, kind = err.kind(), "selection not applied: {err}");
                self.events
                    .borrow_mut()
                    .emit(Some(token), err.kind(), err.to_string());
                return Err(err);
            }
        };

        if !self.sequencer.is_latest(token) {
            debug!(%token, latest = ?self.sequencer.latest(), "dropping superseded selection");
            self.events
                .borrow_mut()
                .emit(Some(token), "superseded", "a newer selection request was issued");
            return Ok(PipelineOutcome::Superseded(token));
        }

        camera.borrow_mut().fly_to(&command);
        let target = command.target;
        info!(
            %token,
            lon = target.longitude_deg,
            lat = target.latitude_deg,
            height = target.height_m,
            "flying to selection"
        );
        self.events.borrow_mut().emit(
            Some(token),
            "fly_to",
            format!(
                "lon {:.6}, lat {:.6}, height {:.1} m",
                target.longitude_deg, target.latitude_deg, target.height_m
            ),
        );
        Ok(PipelineOutcome::Applied(command))
    }

    async fn resolve<C: HostConnector>(&self, connector: &C) -> Result<FlyTo, SelectionError> {
        let bounds = fetch_selection_bounds(connector).await?;
        self.projector.fly_to(&bounds)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{PipelineOutcome, SelectionPipeline};
    use crate::camera::FlyTo;
    use crate::error::SelectionError;
    use crate::host::fake::{FakeConnector, FakeViewer, model};
    use crate::host::{HostError, ObjectBoundingBox, RawBoundingBox};
    use crate::target::{ProjectorConfig, TargetProjector};
    use foundation::math::Vec3;
    use pollster::block_on;

    fn pipeline() -> SelectionPipeline {
        SelectionPipeline::new(TargetProjector::from_config(&ProjectorConfig::default()).unwrap())
    }

    fn connector_with_box(min: Vec3, max: Vec3) -> FakeConnector {
        FakeConnector {
            viewer: FakeViewer::with_selection(vec![model("m-1", Some(vec![42]))]).boxes_for(
                "m-1",
                vec![ObjectBoundingBox {
                    id: Some(42),
                    bounding_box: Some(RawBoundingBox { min, max }),
                }],
            ),
            ..FakeConnector::default()
        }
    }

    fn reference_connector() -> FakeConnector {
        connector_with_box(
            Vec3::new(500_000.0, 9_600_000.0, 10.0),
            Vec3::new(500_010.0, 9_600_010.0, 20.0),
        )
    }

    #[test]
    fn applies_fly_to_for_valid_selection() {
        let pipeline = pipeline();
        let camera = RefCell::new(Vec::<FlyTo>::new());

        let outcome = block_on(pipeline.run(&reference_connector(), &camera)).unwrap();

        let PipelineOutcome::Applied(cmd) = outcome else {
            panic!("expected the camera to move, got {outcome:?}");
        };
        assert_eq!(cmd.target.height_m, 115.0);
        assert_eq!(*camera.borrow(), vec![cmd]);
        assert_eq!(pipeline.recent_events().last().unwrap().kind, "fly_to");
    }

    #[test]
    fn failure_leaves_camera_untouched_and_is_recorded() {
        let pipeline = pipeline();
        let camera = RefCell::new(Vec::<FlyTo>::new());
        let connector = FakeConnector {
            viewer: FakeViewer::with_selection(vec![]),
            ..FakeConnector::default()
        };

        let result = block_on(pipeline.run(&connector, &camera));

        assert_eq!(result, Err(SelectionError::NoSelection));
        assert!(camera.borrow().is_empty());
        let events = pipeline.recent_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "no_selection");
    }

    #[test]
    fn non_finite_coordinate_issues_no_camera_command() {
        let pipeline = pipeline();
        let camera = RefCell::new(Vec::<FlyTo>::new());
        let connector = connector_with_box(
            Vec3::new(f64::MAX / 2.0, 9_600_000.0, 10.0),
            Vec3::new(f64::MAX, 9_600_010.0, 20.0),
        );

        let result = block_on(pipeline.run(&connector, &camera));

        assert!(matches!(
            result,
            Err(SelectionError::InvalidCoordinate { .. })
        ));
        assert!(camera.borrow().is_empty());
    }

    #[test]
    fn connection_failure_is_reported() {
        let pipeline = pipeline();
        let camera = RefCell::new(Vec::<FlyTo>::new());
        let connector = FakeConnector {
            refuse: Some(HostError::new("refused")),
            ..FakeConnector::default()
        };

        let result = block_on(pipeline.run(&connector, &camera));

        assert!(matches!(
            result,
            Err(SelectionError::HostConnectionFailure(_))
        ));
        assert_eq!(
            pipeline.recent_events()[0].kind,
            "host_connection_failure"
        );
    }

    #[test]
    fn superseded_request_does_not_move_camera() {
        let pipeline = Rc::new(pipeline());
        let camera = RefCell::new(Vec::<FlyTo>::new());

        // A newer trigger lands while the first request is waiting on the host.
        let newer = Rc::clone(&pipeline);
        let connector = FakeConnector {
            on_connect: Some(Rc::new(move || {
                newer.sequencer().issue();
            })),
            ..reference_connector()
        };

        let outcome = block_on(pipeline.run(&connector, &camera)).unwrap();

        assert!(matches!(outcome, PipelineOutcome::Superseded(_)));
        assert!(camera.borrow().is_empty());
        assert_eq!(pipeline.recent_events().last().unwrap().kind, "superseded");
    }

    #[test]
    fn later_request_wins_after_earlier_one_completes() {
        let pipeline = pipeline();
        let camera = RefCell::new(Vec::<FlyTo>::new());

        block_on(pipeline.run(&reference_connector(), &camera)).unwrap();
        let second = connector_with_box(
            Vec3::new(500_100.0, 9_600_100.0, 0.0),
            Vec3::new(500_100.0, 9_600_100.0, 0.0),
        );
        block_on(pipeline.run(&second, &camera)).unwrap();

        let camera = camera.borrow();
        assert_eq!(camera.len(), 2);
        assert_eq!(camera[1].target.height_m, 100.0);
    }
}
