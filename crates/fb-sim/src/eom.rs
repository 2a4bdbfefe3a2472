//! Equation of motion for the input link.
//!
//! ```text
//! I * θ'' + c * θ' + k * (θ - θ_eq) = 0
//! ```
//!
//! θ is carried in degrees everywhere, including inside the spring torque
//! term, even though `k` and `c` are quoted per radian. Observed decay and
//! oscillation amplitudes depend on this, so it is kept as is.

use fb_core::{MomentOfInertia, ensure_non_negative, ensure_positive, kg, kg_m2, kgm2, m};
use fb_linkage::LinkLengths;
use tracing::debug;

use crate::error::SimResult;
use crate::params::ParameterSet;

/// Angle (degrees) at which the torsional spring exerts no torque.
///
/// A fixed property of the modeled mechanism, not a user parameter.
pub const EQUILIBRIUM_ANGLE_DEG: f64 = 90.0;

/// Coefficients of the scalar second-order ODE.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquationOfMotion {
    /// kg·m², > 0
    pub effective_inertia: f64,
    /// >= 0
    pub stiffness: f64,
    /// >= 0
    pub damping: f64,
    pub equilibrium_angle_deg: f64,
}

impl EquationOfMotion {
    /// Build directly from coefficients, with the fixed equilibrium angle.
    pub fn new(effective_inertia: f64, stiffness: f64, damping: f64) -> SimResult<Self> {
        Ok(Self {
            effective_inertia: ensure_positive(
                effective_inertia,
                "effective inertia must be finite and positive",
            )?,
            stiffness: ensure_non_negative(stiffness, "stiffness must be finite and non-negative")?,
            damping: ensure_non_negative(damping, "damping must be finite and non-negative")?,
            equilibrium_angle_deg: EQUILIBRIUM_ANGLE_DEG,
        })
    }

    /// θ'' for the given angle (deg) and rate (deg/s).
    pub fn angular_acceleration(&self, theta_deg: f64, omega_deg_s: f64) -> f64 {
        (-self.stiffness * (theta_deg - self.equilibrium_angle_deg) - self.damping * omega_deg_s)
            / self.effective_inertia
    }

    /// Undamped natural frequency `sqrt(k / I)` (1/s).
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.effective_inertia).sqrt()
    }

    /// `c / (2 sqrt(k I))`; infinite when there is no spring.
    pub fn damping_ratio(&self) -> f64 {
        let critical = 2.0 * (self.stiffness * self.effective_inertia).sqrt();
        if critical > 0.0 {
            self.damping / critical
        } else {
            f64::INFINITY
        }
    }
}

/// Derives an [`EquationOfMotion`] from parameters and link lengths.
pub struct EquationOfMotionBuilder;

impl EquationOfMotionBuilder {
    /// Thin-rod inertia about the input pivot, summed over the three links:
    /// `I = Σ (1/3) mᵢ Lᵢ²`.
    ///
    /// This treats every link as a uniform rod pivoting at the input ground
    /// joint, a simplification rather than a true mechanism inertia.
    pub fn build(params: &ParameterSet, lengths: LinkLengths) -> SimResult<EquationOfMotion> {
        let mut inertia = kgm2(0.0);
        for (mass, length) in params.masses().into_iter().zip(lengths.as_array()) {
            let mass = kg(ensure_positive(mass, "link masses must be finite and positive")?);
            let length = m(ensure_positive(
                length,
                "link lengths must be finite and positive",
            )?);
            let rod: MomentOfInertia = mass * length * length / 3.0;
            inertia += rod;
        }

        let eom = EquationOfMotion::new(
            kg_m2(inertia),
            params.spring_stiffness(),
            params.damping_coefficient(),
        )?;
        debug!(
            inertia = eom.effective_inertia,
            stiffness = eom.stiffness,
            damping = eom.damping,
            "assembled equation of motion"
        );
        Ok(eom)
    }
}
