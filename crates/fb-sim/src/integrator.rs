//! Embedded Runge-Kutta step with error estimate.

use fb_core::Tolerances;

use crate::error::SimResult;
use crate::model::TransientModel;

/// Result of one trial step.
#[derive(Clone, Debug)]
pub struct StepAttempt<S> {
    /// Higher-order solution at `t + dt`.
    pub x_new: S,
    /// Derivative at `(t + dt, x_new)`, reusable as the first stage of the
    /// next step and for dense output.
    pub xdot_new: S,
    /// Weighted RMS error estimate; accept when <= 1.
    pub error: f64,
}

/// Trait for error-controlled one-step integrators.
pub trait AdaptiveIntegrator {
    /// Order of the embedded error estimator; step factors scale with
    /// `error^(-1 / (ERROR_ORDER + 1))`.
    const ERROR_ORDER: u32;

    /// Attempt one step of size `dt` from `(t, x)` given `xdot = f(t, x)`.
    fn attempt<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        xdot: &M::State,
        dt: f64,
        tol: Tolerances,
    ) -> SimResult<StepAttempt<M::State>>;
}

/// Dormand-Prince 5(4) with first-same-as-last stage reuse.
#[derive(Clone, Copy, Debug, Default)]
pub struct DormandPrince45;

const C: [f64; 6] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];

/// Fifth-order weights (also the seventh-stage row).
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Fifth minus fourth order weights, stages 1..=7.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// `x + dt * Σ aᵢ kᵢ`
fn combine<M: TransientModel>(
    model: &M,
    x: &M::State,
    k: &[M::State],
    a: &[f64],
    dt: f64,
) -> M::State {
    k.iter()
        .zip(a)
        .filter(|(_, ai)| **ai != 0.0)
        .fold(x.clone(), |acc, (ki, ai)| {
            model.add(&acc, &model.scale(ki, ai * dt))
        })
}

impl AdaptiveIntegrator for DormandPrince45 {
    const ERROR_ORDER: u32 = 4;

    fn attempt<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        xdot: &M::State,
        dt: f64,
        tol: Tolerances,
    ) -> SimResult<StepAttempt<M::State>> {
        let mut k: Vec<M::State> = Vec::with_capacity(7);
        k.push(xdot.clone());

        let rows: [&[f64]; 5] = [&A2, &A3, &A4, &A5, &A6];
        for (stage, a) in rows.into_iter().enumerate() {
            let xs = combine(&*model, x, &k, a, dt);
            let ks = model.rhs(t + C[stage] * dt, &xs)?;
            k.push(ks);
        }

        let x_new = combine(&*model, x, &k, &B, dt);
        let xdot_new = model.rhs(t + C[5] * dt, &x_new)?;
        k.push(xdot_new.clone());

        let zero = model.scale(x, 0.0);
        let err = combine(&*model, &zero, &k, &E, dt);
        let error = model.error_norm(&err, x, &x_new, tol);

        Ok(StepAttempt {
            x_new,
            xdot_new,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = x, exact solution e^t.
    struct Growth;

    impl TransientModel for Growth {
        type State = f64;

        fn initial_state(&self) -> f64 {
            1.0
        }

        fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(*x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }

        fn error_norm(&self, err: &f64, x: &f64, x_new: &f64, tol: Tolerances) -> f64 {
            (err / tol.weight(x.abs().max(x_new.abs()))).abs()
        }

        fn is_finite(&self, x: &f64) -> bool {
            x.is_finite()
        }
    }

    #[test]
    fn weights_are_consistent() {
        let b_sum: f64 = B.iter().sum();
        assert!((b_sum - 1.0).abs() < 1e-14);
        let e_sum: f64 = E.iter().sum();
        assert!(e_sum.abs() < 1e-14);
        let rows: [&[f64]; 5] = [&A2, &A3, &A4, &A5, &A6];
        for (row, c) in rows.iter().zip(C) {
            let s: f64 = row.iter().sum();
            assert!((s - c).abs() < 1e-13);
        }
    }

    #[test]
    fn single_step_is_fifth_order_accurate() {
        let mut model = Growth;
        let tol = Tolerances {
            abs: 1e-8,
            rel: 1e-6,
        };
        let dt = 0.1;
        let step = DormandPrince45
            .attempt(&mut model, 0.0, &1.0, &1.0, dt, tol)
            .unwrap();
        assert!((step.x_new - dt.exp()).abs() < 1e-8);
        assert!((step.xdot_new - step.x_new).abs() < 1e-15);
        assert!(step.error < 1.0);
    }

    #[test]
    fn error_estimate_grows_with_step() {
        let mut model = Growth;
        let tol = Tolerances {
            abs: 1e-8,
            rel: 1e-6,
        };
        let small = DormandPrince45
            .attempt(&mut model, 0.0, &1.0, &1.0, 0.05, tol)
            .unwrap();
        let large = DormandPrince45
            .attempt(&mut model, 0.0, &1.0, &1.0, 0.5, tol)
            .unwrap();
        assert!(large.error > small.error);
    }
}
