//! Project schema definitions.
//!
//! Coordinates are scene units (metres), y axis pointing down. Angles are in
//! degrees, measured counter-clockwise on screen.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub linkage: LinkageDef,
    #[serde(default)]
    pub parameters: ParameterDef,
    #[serde(default)]
    pub simulation: SimulationDef,
}

impl Project {
    /// A project with default linkage, parameters and simulation settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            linkage: LinkageDef::default(),
            parameters: ParameterDef::default(),
            simulation: SimulationDef::default(),
        }
    }
}

/// One rigid link: pivot, length and angle. The endpoint is derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkDef {
    pub start: [f64; 2],
    pub length: f64,
    pub angle_deg: f64,
}

/// The three moving links. The ground link is implied by the input and
/// output pivots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkageDef {
    pub input: LinkDef,
    /// Also called the drag link.
    pub coupler: LinkDef,
    pub output: LinkDef,
}

impl Default for LinkageDef {
    /// Unit parallelogram with the input link standing upright.
    fn default() -> Self {
        Self {
            input: LinkDef {
                start: [0.0, 0.0],
                length: 1.0,
                angle_deg: 90.0,
            },
            coupler: LinkDef {
                start: [0.0, -1.0],
                length: 1.0,
                angle_deg: 0.0,
            },
            output: LinkDef {
                start: [1.0, 0.0],
                length: 1.0,
                angle_deg: 90.0,
            },
        }
    }
}

/// Physical parameters of the input-link spring-damper.
///
/// Typical editor ranges: masses 0.1 to 20 kg, stiffness 0 to 1000 N·m/rad,
/// damping 0 to 100 N·m·s/rad. Bounds must lie in `[0, 360]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDef {
    /// Input, coupler, output link masses (kg).
    #[serde(default = "default_masses")]
    pub masses_kg: [f64; 3],
    #[serde(default = "default_spring_stiffness")]
    pub spring_stiffness: f64,
    #[serde(default = "default_damping_coefficient")]
    pub damping_coefficient: f64,
    #[serde(default = "default_angle_min")]
    pub angle_min_deg: f64,
    #[serde(default = "default_angle_max")]
    pub angle_max_deg: f64,
}

impl Default for ParameterDef {
    fn default() -> Self {
        Self {
            masses_kg: default_masses(),
            spring_stiffness: default_spring_stiffness(),
            damping_coefficient: default_damping_coefficient(),
            angle_min_deg: default_angle_min(),
            angle_max_deg: default_angle_max(),
        }
    }
}

fn default_masses() -> [f64; 3] {
    [1.0; 3]
}

fn default_spring_stiffness() -> f64 {
    50.0
}

fn default_damping_coefficient() -> f64 {
    5.0
}

fn default_angle_min() -> f64 {
    0.0
}

fn default_angle_max() -> f64 {
    360.0
}

/// Horizon, sampling and integrator settings for a free-response run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default = "default_duration")]
    pub duration_s: f64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: f64,
    /// Initial angular rate (deg/s). The initial angle is always the current
    /// input angle.
    #[serde(default)]
    pub initial_rate_deg_s: f64,
    #[serde(default)]
    pub integrator: IntegratorDef,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            duration_s: default_duration(),
            sample_rate_hz: default_sample_rate(),
            initial_rate_deg_s: 0.0,
            integrator: IntegratorDef::default(),
        }
    }
}

fn default_duration() -> f64 {
    5.0
}

fn default_sample_rate() -> f64 {
    60.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegratorDef {
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for IntegratorDef {
    fn default() -> Self {
        Self {
            abs_tol: default_abs_tol(),
            rel_tol: default_rel_tol(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_abs_tol() -> f64 {
    1e-8
}

fn default_rel_tol() -> f64 {
    1e-6
}

fn default_max_steps() -> usize {
    1_000_000
}
