//! Editing, simulation and playback of one linkage.
//!
//! `LinkageSession` is what a front-end talks to. It owns the parameter set
//! and the clamp controller; every change of the input angle, whatever its
//! source, ends up in `AngleClampController::set_input_angle_deg`.

use fb_linkage::{LinkLengths, LinkRole, LinkageGeometryPort, LinkageView, Point2};
use fb_project::schema::{Project, SimulationDef};
use fb_sim::{
    AngleBounds, AngleClampController, EquationOfMotion, EquationOfMotionBuilder, ParameterSet,
    PlaybackState, PlaybackStepper, TickOutcome, TickRate, Trajectory, TrajectorySolver,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::runtime_compile;

/// Horizon and sampling of a free-response run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub duration_s: f64,
    pub sample_rate_hz: f64,
    /// Initial angular rate (deg/s).
    pub initial_rate_deg_s: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self::from(&SimulationDef::default())
    }
}

impl From<&SimulationDef> for SimulationSettings {
    fn from(def: &SimulationDef) -> Self {
        Self {
            duration_s: def.duration_s,
            sample_rate_hz: def.sample_rate_hz,
            initial_rate_deg_s: def.initial_rate_deg_s,
        }
    }
}

pub struct LinkageSession<P, V> {
    params: ParameterSet,
    controller: AngleClampController<P, V>,
    stepper: PlaybackStepper,
    solver: TrajectorySolver,
    settings: SimulationSettings,
    trajectory: Option<Trajectory>,
}

impl<P: LinkageGeometryPort, V: LinkageView> LinkageSession<P, V> {
    /// Build a session from a project file. The stored input angle is pulled
    /// inside the project's bounds before the session is returned.
    pub fn from_project(project: &Project, port: P, view: V) -> AppResult<Self> {
        let params = runtime_compile::build_parameters(&project.parameters)?;
        let linkage = runtime_compile::build_linkage(&project.linkage)?;
        let solver = runtime_compile::build_solver(&project.simulation.integrator);
        let controller = AngleClampController::with_input_angle_deg(
            linkage,
            project.linkage.input.angle_deg,
            params.bounds(),
            port,
            view,
        )?;
        Self::new(
            params,
            controller,
            solver,
            SimulationSettings::from(&project.simulation),
        )
    }

    pub fn new(
        params: ParameterSet,
        mut controller: AngleClampController<P, V>,
        solver: TrajectorySolver,
        settings: SimulationSettings,
    ) -> AppResult<Self> {
        let rate = TickRate::from_frequency(settings.sample_rate_hz)?;
        controller.set_bounds(params.bounds())?;
        Ok(Self {
            params,
            controller,
            stepper: PlaybackStepper::new(rate),
            solver,
            settings,
            trajectory: None,
        })
    }

    /// Snapshot of the current model in file form.
    pub fn to_project(&self, name: impl Into<String>) -> Project {
        let mut project = Project::new(name);
        project.linkage = runtime_compile::linkage_def(self.controller.linkage());
        project.linkage.input.angle_deg = self.controller.input_angle_deg();
        project.parameters = runtime_compile::parameter_def(&self.params);
        project.simulation = SimulationDef {
            duration_s: self.settings.duration_s,
            sample_rate_hz: self.settings.sample_rate_hz,
            initial_rate_deg_s: self.settings.initial_rate_deg_s,
            integrator: runtime_compile::integrator_def(&self.solver),
        };
        project
    }

    // Direct manipulation

    /// Propose an input angle; returns the enforced angle.
    pub fn set_input_angle_deg(&mut self, proposed_deg: f64) -> AppResult<f64> {
        Ok(self.controller.set_input_angle_deg(proposed_deg)?)
    }

    /// Pointer drag on the input link. `None` while playback owns the angle.
    pub fn drag_input_to(&mut self, pointer: Point2) -> AppResult<Option<f64>> {
        Ok(self.controller.drag_input_to(pointer)?)
    }

    // Parameter edits

    /// Edit the lower bound and re-clamp. Returns the enforced input angle.
    pub fn set_angle_min(&mut self, min_deg: f64) -> AppResult<f64> {
        let mut params = self.params.clone();
        let bounds = params.set_angle_min(min_deg)?;
        self.apply_bounds(params, bounds)
    }

    /// Edit the upper bound and re-clamp. Returns the enforced input angle.
    pub fn set_angle_max(&mut self, max_deg: f64) -> AppResult<f64> {
        let mut params = self.params.clone();
        let bounds = params.set_angle_max(max_deg)?;
        self.apply_bounds(params, bounds)
    }

    /// Commit `params` once the controller has accepted `bounds`.
    fn apply_bounds(&mut self, params: ParameterSet, bounds: AngleBounds) -> AppResult<f64> {
        debug!(
            min_deg = bounds.min_deg(),
            max_deg = bounds.max_deg(),
            "angle bounds edited"
        );
        let enforced = self.controller.set_bounds(bounds)?;
        self.params = params;
        Ok(enforced)
    }

    pub fn set_masses(&mut self, masses: [f64; 3]) -> AppResult<()> {
        self.params.set_masses(masses)?;
        Ok(())
    }

    /// Update the spring and redraw (the spring is part of the drawing).
    pub fn set_spring_stiffness(&mut self, k: f64) -> AppResult<()> {
        self.params.set_spring_stiffness(k)?;
        self.controller.refresh_view();
        Ok(())
    }

    pub fn set_damping_coefficient(&mut self, c: f64) -> AppResult<()> {
        self.params.set_damping_coefficient(c)?;
        Ok(())
    }

    pub fn set_input_link_length(&mut self, length: f64) -> AppResult<()> {
        Ok(self.controller.set_link_length(LinkRole::Input, length)?)
    }

    pub fn set_output_link_length(&mut self, length: f64) -> AppResult<()> {
        Ok(self.controller.set_link_length(LinkRole::Output, length)?)
    }

    /// Change horizon, sample rate or initial rate. Takes effect on the next
    /// `simulate()`; the playback cadence follows the sample rate.
    pub fn set_simulation(&mut self, settings: SimulationSettings) -> AppResult<()> {
        if self.stepper.is_running() {
            return Err(AppError::InvalidInput(
                "cannot change simulation settings during playback".to_string(),
            ));
        }
        let rate = TickRate::from_frequency(settings.sample_rate_hz)?;
        fb_sim::sample_times(settings.duration_s, settings.sample_rate_hz)?;
        if !settings.initial_rate_deg_s.is_finite() {
            return Err(AppError::InvalidInput(
                "initial rate must be finite".to_string(),
            ));
        }
        self.settings = settings;
        self.stepper = PlaybackStepper::new(rate);
        Ok(())
    }

    // Simulation and playback

    pub fn equation_of_motion(&self) -> AppResult<EquationOfMotion> {
        Ok(EquationOfMotionBuilder::build(
            &self.params,
            self.controller.link_lengths(),
        )?)
    }

    /// Solve the free response from the current input angle.
    ///
    /// Any running playback is stopped first; the previous trajectory is
    /// replaced.
    pub fn simulate(&mut self) -> AppResult<&Trajectory> {
        if self.stepper.is_running() {
            self.stepper.stop(&mut self.controller);
        }
        let eom = self.equation_of_motion()?;
        let theta0 = self.controller.input_angle_deg();
        info!(
            theta0_deg = theta0,
            inertia = eom.effective_inertia,
            damping_ratio = eom.damping_ratio(),
            "simulating free response"
        );
        let trajectory = self.solver.solve(
            &eom,
            theta0,
            self.settings.initial_rate_deg_s,
            self.settings.duration_s,
            self.settings.sample_rate_hz,
        )?;
        Ok(self.trajectory.insert(trajectory))
    }

    /// Play the last simulated trajectory from the start.
    pub fn start_playback(&mut self) -> AppResult<()> {
        let Some(trajectory) = self.trajectory.clone() else {
            return Err(AppError::InvalidInput(
                "no trajectory to play; simulate first".to_string(),
            ));
        };
        self.stepper.start(trajectory, &mut self.controller);
        Ok(())
    }

    /// Simulate and immediately start playback.
    pub fn simulate_and_play(&mut self) -> AppResult<usize> {
        let len = self.simulate()?.len();
        self.start_playback()?;
        Ok(len)
    }

    /// Advance playback by one sample.
    pub fn tick(&mut self) -> AppResult<TickOutcome> {
        Ok(self.stepper.tick(&mut self.controller)?)
    }

    pub fn stop_playback(&mut self) {
        self.stepper.stop(&mut self.controller);
    }

    // Queries

    pub fn playback_state(&self) -> PlaybackState {
        self.stepper.state()
    }

    pub fn is_running(&self) -> bool {
        self.stepper.is_running()
    }

    pub fn playback_position(&self) -> (usize, usize) {
        self.stepper.position()
    }

    pub fn tick_rate(&self) -> TickRate {
        self.stepper.tick_rate()
    }

    pub fn input_angle_deg(&self) -> f64 {
        self.controller.input_angle_deg()
    }

    pub fn output_angle_deg(&self) -> f64 {
        self.controller.output_angle_deg()
    }

    pub fn link_lengths(&self) -> LinkLengths {
        self.controller.link_lengths()
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn settings(&self) -> SimulationSettings {
        self.settings
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn controller(&self) -> &AngleClampController<P, V> {
        &self.controller
    }
}
