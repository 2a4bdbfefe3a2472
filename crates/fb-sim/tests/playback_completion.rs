//! Integration test: a solved trajectory played through the clamp controller.
//!
//! Scenario: masses (2, 1, 3) kg, unit links, k = 50, c = 5, bounds [10, 170].
//! The drag starts out of range, is clamped, the free response is solved from
//! the clamped angle and then played back tick by tick.

use fb_core::deg_to_rad;
use fb_linkage::{
    GeometryResult, LinkGeometry, LinkRole, Linkage, LinkageGeometryPort, LinkageView, Point2,
    endpoint_from,
};
use fb_sim::{
    AngleBounds, AngleClampController, EquationOfMotionBuilder, ParameterSet, PlaybackState,
    PlaybackStepper, SimError, TrajectorySolver,
};
use proptest::prelude::*;

/// Keeps the coupler attached to the input endpoint.
#[derive(Default)]
struct AttachCoupler {
    calls: usize,
}

impl LinkageGeometryPort for AttachCoupler {
    fn compute_from_input_endpoint(
        &mut self,
        current: &Linkage,
        input_end: Point2,
    ) -> GeometryResult<Linkage> {
        self.calls += 1;
        let mut next = current.clone();
        next.coupler.start = input_end;
        next.coupler.end = endpoint_from(input_end, next.coupler.length, next.coupler.angle);
        Ok(next)
    }
}

#[derive(Default)]
struct Recorder {
    redraws: usize,
    drag_enabled: Option<bool>,
}

impl LinkageView for Recorder {
    fn geometry_changed(&mut self) {
        self.redraws += 1;
    }

    fn set_drag_enabled(&mut self, enabled: bool) {
        self.drag_enabled = Some(enabled);
    }
}

fn unit_linkage(input_deg: f64) -> Linkage {
    let input =
        LinkGeometry::new(LinkRole::Input, Point2::origin(), 1.0, deg_to_rad(input_deg)).unwrap();
    let coupler = LinkGeometry::new(LinkRole::Coupler, input.end, 1.0, 0.0).unwrap();
    let output =
        LinkGeometry::new(LinkRole::Output, Point2::new(1.0, 0.0), 1.0, deg_to_rad(90.0)).unwrap();
    Linkage::new(input, coupler, output)
}

fn scenario() -> (ParameterSet, AngleClampController<AttachCoupler, Recorder>) {
    let bounds = AngleBounds::new(10.0, 170.0).unwrap();
    let params = ParameterSet::new([2.0, 1.0, 3.0], 50.0, 5.0, bounds).unwrap();
    let controller = AngleClampController::new(
        unit_linkage(90.0),
        bounds,
        AttachCoupler::default(),
        Recorder::default(),
    );
    (params, controller)
}

#[test]
fn clamped_drag_then_full_playback() {
    let (params, mut controller) = scenario();

    let eom = EquationOfMotionBuilder::build(&params, controller.link_lengths()).unwrap();
    assert!((eom.effective_inertia - 2.0).abs() < 1e-12);

    // out-of-range proposal snaps to the upper bound before any simulation
    assert_eq!(controller.set_input_angle_deg(190.0).unwrap(), 170.0);
    assert_eq!(controller.input_angle_deg(), 170.0);
    let expected_end = endpoint_from(Point2::origin(), 1.0, deg_to_rad(170.0));
    assert!((controller.linkage().input.end - expected_end).norm() < 1e-12);

    let traj = TrajectorySolver::default()
        .solve(&eom, controller.input_angle_deg(), 0.0, 5.0, 60.0)
        .unwrap();
    assert_eq!(traj.len(), 300);

    let mut stepper = PlaybackStepper::default();
    stepper.start(traj.clone(), &mut controller);
    assert_eq!(controller.view().drag_enabled, Some(false));

    for _ in 0..traj.len() - 1 {
        let outcome = stepper.tick(&mut controller).unwrap();
        assert!(!outcome.finished);
        assert!(controller.bounds().contains(outcome.enforced_deg));
    }
    assert_eq!(stepper.state(), PlaybackState::Running);
    assert!(!controller.drag_enabled());

    let last = stepper.tick(&mut controller).unwrap();
    assert!(last.finished);
    assert_eq!(last.index, traj.len() - 1);
    assert_eq!(stepper.state(), PlaybackState::Finished);
    assert_eq!(controller.view().drag_enabled, Some(true));
    assert_eq!(stepper.tick(&mut controller), Err(SimError::NotRunning));

    let final_angle = traj.last().unwrap().angle_deg;
    assert_eq!(controller.input_angle_deg(), final_angle);
    assert!((final_angle - 90.0).abs() < 0.5);
}

#[test]
fn playback_samples_are_clamped() {
    let (_, mut controller) = scenario();
    // a wide swing that would leave the bounds without clamping
    let params = ParameterSet::new([1.0, 1.0, 1.0], 50.0, 0.5, AngleBounds::full()).unwrap();
    let eom = EquationOfMotionBuilder::build(&params, controller.link_lengths()).unwrap();
    let traj = TrajectorySolver::default()
        .solve(&eom, 5.0, 0.0, 2.0, 60.0)
        .unwrap();
    assert!(traj.angles().any(|a| a < 10.0 || a > 170.0));

    let mut stepper = PlaybackStepper::default();
    stepper.start(traj, &mut controller);
    while stepper.is_running() {
        let outcome = stepper.tick(&mut controller).unwrap();
        assert!((10.0..=170.0).contains(&outcome.enforced_deg));
    }
}

#[test]
fn stop_mid_run_leaves_last_applied_angle() {
    let (params, mut controller) = scenario();
    let eom = EquationOfMotionBuilder::build(&params, controller.link_lengths()).unwrap();
    let traj = TrajectorySolver::default()
        .solve(&eom, 120.0, 0.0, 5.0, 60.0)
        .unwrap();

    let mut stepper = PlaybackStepper::default();
    stepper.start(traj.clone(), &mut controller);
    for _ in 0..10 {
        stepper.tick(&mut controller).unwrap();
    }
    assert_eq!(stepper.position(), (10, 300));
    stepper.stop(&mut controller);

    assert_eq!(stepper.state(), PlaybackState::Idle);
    assert!(controller.drag_enabled());
    assert_eq!(controller.input_angle_deg(), traj.get(9).unwrap().angle_deg);
}

proptest! {
    #[test]
    fn enforced_angle_is_within_bounds_and_stable(
        lo in 0.0f64..360.0,
        span in 0.0f64..360.0,
        proposed in -720.0f64..720.0,
    ) {
        let hi = (lo + span).min(360.0);
        let bounds = AngleBounds::new(lo, hi).unwrap();
        let mut controller = AngleClampController::new(
            unit_linkage(0.0),
            bounds,
            AttachCoupler::default(),
            Recorder::default(),
        );

        let enforced = controller.set_input_angle_deg(proposed).unwrap();
        prop_assert!(bounds.contains(enforced));
        if bounds.contains(proposed) {
            prop_assert_eq!(enforced, proposed);
        }

        let calls = controller.port().calls;
        let redraws = controller.view().redraws;
        prop_assert_eq!(controller.set_input_angle_deg(enforced).unwrap(), enforced);
        prop_assert_eq!(controller.port().calls, calls);
        prop_assert_eq!(controller.view().redraws, redraws);
    }
}
