//! Fixed-rate playback of a precomputed trajectory.
//!
//! The stepper is driven from outside: one `tick()` per timer period pushes
//! exactly one sample through the clamp controller. No samples are skipped or
//! interpolated, so a slow driver stretches playback in wall time but never
//! changes the sequence of angles.

use fb_linkage::{LinkageGeometryPort, LinkageView};
use tracing::{debug, info, warn};

use crate::clamp::AngleClampController;
use crate::error::{SimError, SimResult};
use crate::sampled::TickRate;
use crate::trajectory::Trajectory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Position within the trajectory being played.
#[derive(Clone, Debug)]
struct PlaybackCursor {
    trajectory: Trajectory,
    index: usize,
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    /// Index of the sample just applied.
    pub index: usize,
    pub time_s: f64,
    /// Angle after clamping (may differ from the sample).
    pub enforced_deg: f64,
    /// True when this tick consumed the last sample.
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct PlaybackStepper {
    state: PlaybackState,
    cursor: Option<PlaybackCursor>,
    rate: TickRate,
}

impl PlaybackStepper {
    pub fn new(rate: TickRate) -> Self {
        Self {
            state: PlaybackState::Idle,
            cursor: None,
            rate,
        }
    }

    /// Begin playing `trajectory` from its first sample.
    ///
    /// Restarts from any state. Dragging is disabled for the duration of the
    /// run; an empty trajectory finishes at once and leaves dragging on.
    pub fn start<P, V>(
        &mut self,
        trajectory: Trajectory,
        controller: &mut AngleClampController<P, V>,
    ) where
        P: LinkageGeometryPort,
        V: LinkageView,
    {
        if trajectory.is_empty() {
            self.cursor = None;
            self.state = PlaybackState::Finished;
            controller.set_drag_enabled(true);
            return;
        }
        info!(
            samples = trajectory.len(),
            interval_ms = self.rate.timer_interval_ms(),
            "playback started"
        );
        self.cursor = Some(PlaybackCursor {
            trajectory,
            index: 0,
        });
        self.state = PlaybackState::Running;
        controller.set_drag_enabled(false);
    }

    /// Apply the next sample.
    ///
    /// # Errors
    /// `NotRunning` outside a run. A geometry failure stops playback, re-enables
    /// dragging and is returned as `GeometryInfeasible`.
    pub fn tick<P, V>(
        &mut self,
        controller: &mut AngleClampController<P, V>,
    ) -> SimResult<TickOutcome>
    where
        P: LinkageGeometryPort,
        V: LinkageView,
    {
        if self.state != PlaybackState::Running {
            return Err(SimError::NotRunning);
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(SimError::NotRunning);
        };
        let index = cursor.index;
        let Some(sample) = cursor.trajectory.get(index) else {
            return Err(SimError::NotRunning);
        };

        let enforced_deg = match controller.set_input_angle_deg(sample.angle_deg) {
            Ok(angle) => angle,
            Err(e) => {
                warn!(
                    index,
                    time_s = sample.time_s,
                    error = %e,
                    "playback stopped by geometry failure"
                );
                self.stop(controller);
                return Err(e.into());
            }
        };
        cursor.index += 1;
        debug!(index, time_s = sample.time_s, enforced_deg, "playback tick");

        let finished = cursor.index >= cursor.trajectory.len();
        if finished {
            self.cursor = None;
            self.state = PlaybackState::Finished;
            controller.set_drag_enabled(true);
            info!(ticks = index + 1, "playback finished");
        }
        Ok(TickOutcome {
            index,
            time_s: sample.time_s,
            enforced_deg,
            finished,
        })
    }

    /// Abandon the current run. Always leaves dragging enabled.
    pub fn stop<P, V>(&mut self, controller: &mut AngleClampController<P, V>)
    where
        P: LinkageGeometryPort,
        V: LinkageView,
    {
        if self.state == PlaybackState::Running {
            info!("playback stopped");
            self.state = PlaybackState::Idle;
        }
        self.cursor = None;
        controller.set_drag_enabled(true);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// `(next index, trajectory length)`; `(0, 0)` when nothing is loaded.
    pub fn position(&self) -> (usize, usize) {
        self.cursor
            .as_ref()
            .map(|c| (c.index, c.trajectory.len()))
            .unwrap_or((0, 0))
    }

    pub fn tick_rate(&self) -> TickRate {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AngleBounds;
    use crate::trajectory::Sample;
    use fb_core::deg_to_rad;
    use fb_linkage::{GeometryError, GeometryResult, LinkGeometry, LinkRole, Linkage, Point2};

    struct Port {
        fail_below_deg: Option<f64>,
    }

    impl LinkageGeometryPort for Port {
        fn compute_from_input_endpoint(
            &mut self,
            current: &Linkage,
            _input_end: Point2,
        ) -> GeometryResult<Linkage> {
            if let Some(limit) = self.fail_below_deg {
                if current.input.angle_deg() < limit {
                    return Err(GeometryError::Infeasible {
                        reason: "toggle position".to_string(),
                    });
                }
            }
            Ok(current.clone())
        }
    }

    #[derive(Default)]
    struct View {
        drag_history: Vec<bool>,
    }

    impl LinkageView for View {
        fn geometry_changed(&mut self) {}

        fn set_drag_enabled(&mut self, enabled: bool) {
            self.drag_history.push(enabled);
        }
    }

    fn controller(fail_below_deg: Option<f64>) -> AngleClampController<Port, View> {
        let input =
            LinkGeometry::new(LinkRole::Input, Point2::origin(), 1.0, deg_to_rad(90.0)).unwrap();
        let coupler = LinkGeometry::new(LinkRole::Coupler, input.end, 1.0, 0.0).unwrap();
        let output =
            LinkGeometry::new(LinkRole::Output, Point2::new(1.0, 0.0), 1.0, deg_to_rad(90.0))
                .unwrap();
        AngleClampController::new(
            Linkage::new(input, coupler, output),
            AngleBounds::new(10.0, 170.0).unwrap(),
            Port { fail_below_deg },
            View::default(),
        )
    }

    fn trajectory(angles: &[f64]) -> Trajectory {
        let samples = angles
            .iter()
            .enumerate()
            .map(|(i, &angle_deg)| Sample {
                time_s: i as f64 * 0.1,
                angle_deg,
            })
            .collect();
        Trajectory::from_samples(samples).unwrap()
    }

    #[test]
    fn runs_every_sample_in_order() {
        let mut c = controller(None);
        let mut stepper = PlaybackStepper::default();
        stepper.start(trajectory(&[100.0, 200.0, 120.0]), &mut c);
        assert!(stepper.is_running());
        assert!(!c.drag_enabled());
        assert_eq!(stepper.position(), (0, 3));

        let first = stepper.tick(&mut c).unwrap();
        assert_eq!((first.index, first.enforced_deg, first.finished), (0, 100.0, false));
        let second = stepper.tick(&mut c).unwrap();
        assert_eq!(second.enforced_deg, 170.0);
        assert_eq!(stepper.state(), PlaybackState::Running);

        let last = stepper.tick(&mut c).unwrap();
        assert!(last.finished);
        assert_eq!(last.index, 2);
        assert!((last.time_s - 0.2).abs() < 1e-12);
        assert_eq!(stepper.state(), PlaybackState::Finished);
        assert!(c.drag_enabled());
        assert_eq!(c.input_angle_deg(), 120.0);
        assert_eq!(c.view().drag_history, vec![false, true]);
    }

    #[test]
    fn tick_outside_run_is_an_error() {
        let mut c = controller(None);
        let mut stepper = PlaybackStepper::default();
        assert_eq!(stepper.tick(&mut c), Err(SimError::NotRunning));

        stepper.start(trajectory(&[50.0]), &mut c);
        stepper.tick(&mut c).unwrap();
        assert_eq!(stepper.tick(&mut c), Err(SimError::NotRunning));
    }

    #[test]
    fn stop_returns_to_idle_and_enables_drag() {
        let mut c = controller(None);
        let mut stepper = PlaybackStepper::default();
        stepper.start(trajectory(&[50.0, 60.0]), &mut c);
        stepper.tick(&mut c).unwrap();
        stepper.stop(&mut c);
        assert_eq!(stepper.state(), PlaybackState::Idle);
        assert_eq!(stepper.position(), (0, 0));
        assert!(c.drag_enabled());

        // stopping again is harmless
        stepper.stop(&mut c);
        assert!(c.drag_enabled());
        assert_eq!(c.input_angle_deg(), 50.0);
    }

    #[test]
    fn restart_begins_from_first_sample() {
        let mut c = controller(None);
        let mut stepper = PlaybackStepper::default();
        stepper.start(trajectory(&[50.0, 60.0, 70.0]), &mut c);
        stepper.tick(&mut c).unwrap();
        stepper.tick(&mut c).unwrap();
        stepper.start(trajectory(&[30.0, 40.0]), &mut c);
        assert_eq!(stepper.position(), (0, 2));
        assert_eq!(stepper.tick(&mut c).unwrap().enforced_deg, 30.0);
    }

    #[test]
    fn empty_trajectory_finishes_immediately() {
        let mut c = controller(None);
        let mut stepper = PlaybackStepper::default();
        stepper.start(Trajectory::from_samples(Vec::new()).unwrap(), &mut c);
        assert_eq!(stepper.state(), PlaybackState::Finished);
        assert!(c.drag_enabled());
    }

    #[test]
    fn geometry_failure_stops_playback() {
        let mut c = controller(Some(40.0));
        let mut stepper = PlaybackStepper::default();
        stepper.start(trajectory(&[60.0, 20.0, 80.0]), &mut c);
        stepper.tick(&mut c).unwrap();

        let err = stepper.tick(&mut c).unwrap_err();
        assert!(matches!(err, SimError::GeometryInfeasible(_)));
        assert_eq!(stepper.state(), PlaybackState::Idle);
        assert!(c.drag_enabled());
        assert_eq!(c.input_angle_deg(), 60.0);
    }

    #[test]
    fn carries_tick_rate() {
        let stepper = PlaybackStepper::new(TickRate::from_frequency(30.0).unwrap());
        assert_eq!(stepper.tick_rate().timer_interval_ms(), 33);
        assert_eq!(PlaybackStepper::default().tick_rate(), TickRate::default());
    }
}
