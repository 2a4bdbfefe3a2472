//! TransientModel trait for pluggable dynamic systems.

use fb_core::Tolerances;
use nalgebra::Vector2;

use crate::eom::EquationOfMotion;
use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Vector-space arithmetic for integration: add states, scale by scalar
/// - A weighted error norm for adaptive step control
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Root-mean-square of `err` weighted per component by
    /// `abs + rel * max(|x|, |x_new|)`. A value <= 1 is within tolerance.
    fn error_norm(
        &self,
        err: &Self::State,
        x: &Self::State,
        x_new: &Self::State,
        tol: Tolerances,
    ) -> f64;

    /// True when every component is finite.
    fn is_finite(&self, x: &Self::State) -> bool;
}

/// Damped torsional oscillator on the input link.
///
/// State is `[θ, ω]` in degrees and degrees per second.
#[derive(Clone, Debug)]
pub struct OscillatorModel {
    pub eom: EquationOfMotion,
    pub theta0_deg: f64,
    pub omega0_deg_s: f64,
}

impl OscillatorModel {
    pub fn new(eom: EquationOfMotion, theta0_deg: f64, omega0_deg_s: f64) -> Self {
        Self {
            eom,
            theta0_deg,
            omega0_deg_s,
        }
    }
}

impl TransientModel for OscillatorModel {
    type State = Vector2<f64>;

    fn initial_state(&self) -> Self::State {
        Vector2::new(self.theta0_deg, self.omega0_deg_s)
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(Vector2::new(x[1], self.eom.angular_acceleration(x[0], x[1])))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }

    fn error_norm(
        &self,
        err: &Self::State,
        x: &Self::State,
        x_new: &Self::State,
        tol: Tolerances,
    ) -> f64 {
        let sum_sq: f64 = (0..2)
            .map(|i| {
                let w = tol.weight(x[i].abs().max(x_new[i].abs()));
                (err[i] / w).powi(2)
            })
            .sum();
        (sum_sq / 2.0).sqrt()
    }

    fn is_finite(&self, x: &Self::State) -> bool {
        x.iter().all(|v| v.is_finite())
    }
}
