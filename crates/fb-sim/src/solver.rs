//! Adaptive integration resampled onto fixed output times.

use fb_core::Tolerances;
use tracing::{debug, info};

use crate::eom::EquationOfMotion;
use crate::error::{SimError, SimResult};
use crate::integrator::{AdaptiveIntegrator, DormandPrince45};
use crate::model::{OscillatorModel, TransientModel};
use crate::trajectory::{Sample, Trajectory, sample_times};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Options for adaptive solves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOptions {
    /// Local error tolerances per state component.
    pub tolerances: Tolerances,
    /// Attempted steps (accepted + rejected) before giving up.
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances {
                abs: 1e-8,
                rel: 1e-6,
            },
            max_steps: 1_000_000,
        }
    }
}

impl SolverOptions {
    fn validate(&self) -> SimResult<()> {
        let Tolerances { abs, rel } = self.tolerances;
        if !(abs.is_finite() && abs > 0.0 && rel.is_finite() && rel >= 0.0) {
            return Err(SimError::InvalidParameter {
                what: "tolerances must be finite, abs > 0 and rel >= 0",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidParameter {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// Step bookkeeping from one solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
}

/// Cubic Hermite interpolation on `[t0, t0 + h]` from end values and slopes.
fn hermite<M: TransientModel>(
    model: &M,
    (x0, f0): (&M::State, &M::State),
    (x1, f1): (&M::State, &M::State),
    h: f64,
    s: f64,
) -> M::State {
    let s2 = s * s;
    let s3 = s2 * s;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    // x0 + h01 (x1 - x0) keeps a constant solution exactly constant
    let dx = model.add(x1, &model.scale(x0, -1.0));
    let slopes = model.add(&model.scale(f0, h10 * h), &model.scale(f1, h11 * h));
    model.add(x0, &model.add(&model.scale(&dx, h01), &slopes))
}

/// Starting step from the scale of the state and its derivatives.
fn initial_step<M: TransientModel>(
    model: &mut M,
    x0: &M::State,
    f0: &M::State,
    t_end: f64,
    order: u32,
    tol: Tolerances,
    stats: &mut SolveStats,
) -> SimResult<f64> {
    let d0 = model.error_norm(x0, x0, x0, tol);
    let d1 = model.error_norm(f0, x0, x0, tol);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(t_end);

    let x1 = model.add(x0, &model.scale(f0, h0));
    let f1 = model.rhs(h0, &x1)?;
    stats.rhs_evals += 1;
    let df = model.add(&f1, &model.scale(f0, -1.0));
    let d2 = model.error_norm(&df, x0, x0, tol) / h0;

    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (order as f64 + 1.0))
    };
    Ok((100.0 * h0).min(h1).min(t_end))
}

/// Integrate `model` from `t = 0` and report its state at each of `t_eval`.
///
/// `t_eval` must start at 0 and be strictly increasing. Steps are chosen by
/// the embedded error estimate; output between accepted steps is
/// interpolated, so the output grid does not constrain the step size.
pub fn integrate_at<M: TransientModel, I: AdaptiveIntegrator>(
    model: &mut M,
    integrator: &I,
    t_eval: &[f64],
    opts: &SolverOptions,
) -> SimResult<(Vec<M::State>, SolveStats)> {
    opts.validate()?;
    let mut stats = SolveStats::default();
    let Some(&t_end) = t_eval.last() else {
        return Ok((Vec::new(), stats));
    };
    if t_eval[0] != 0.0 {
        return Err(SimError::InvalidParameter {
            what: "output times must start at 0",
        });
    }
    if t_eval.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(SimError::InvalidParameter {
            what: "output times must be strictly increasing",
        });
    }

    let tol = opts.tolerances;
    let exponent = -1.0 / (I::ERROR_ORDER as f64 + 1.0);

    let mut t = 0.0;
    let mut x = model.initial_state();
    if !model.is_finite(&x) {
        return Err(SimError::InvalidParameter {
            what: "initial state must be finite",
        });
    }
    let mut xdot = model.rhs(t, &x)?;
    stats.rhs_evals += 1;

    let mut out = Vec::with_capacity(t_eval.len());
    out.push(x.clone());
    let mut next = 1;
    if next == t_eval.len() {
        return Ok((out, stats));
    }

    let mut h = initial_step(
        model,
        &x,
        &xdot,
        t_end,
        I::ERROR_ORDER,
        tol,
        &mut stats,
    )?;
    let mut just_rejected = false;

    while next < t_eval.len() {
        if stats.accepted_steps + stats.rejected_steps >= opts.max_steps {
            return Err(SimError::Integration {
                what: "step budget exhausted",
                t,
            });
        }

        let min_step = 10.0 * f64::EPSILON * t.abs().max(f64::MIN_POSITIVE);
        let reaches_end = t + h >= t_end;
        if reaches_end {
            h = t_end - t;
        }

        let step = integrator.attempt(model, t, &x, &xdot, h, tol)?;
        stats.rhs_evals += 6;

        if !(model.is_finite(&step.x_new) && step.error.is_finite()) {
            return Err(SimError::Integration {
                what: "state became non-finite",
                t,
            });
        }

        if step.error <= 1.0 {
            let t_new = if reaches_end { t_end } else { t + h };

            while next < t_eval.len() && t_eval[next] <= t_new {
                let s = (t_eval[next] - t) / h;
                out.push(hermite(
                    &*model,
                    (&x, &xdot),
                    (&step.x_new, &step.xdot_new),
                    h,
                    s,
                ));
                next += 1;
            }

            stats.accepted_steps += 1;
            t = t_new;
            x = step.x_new;
            xdot = step.xdot_new;

            let mut factor = if step.error == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * step.error.powf(exponent)).clamp(MIN_FACTOR, MAX_FACTOR)
            };
            if just_rejected {
                factor = factor.min(1.0);
            }
            just_rejected = false;
            h *= factor;
        } else {
            stats.rejected_steps += 1;
            just_rejected = true;
            h *= (SAFETY * step.error.powf(exponent)).max(MIN_FACTOR);
            if h < min_step {
                return Err(SimError::Integration {
                    what: "step size underflow",
                    t,
                });
            }
        }
    }

    Ok((out, stats))
}

/// Produces fixed-rate angle trajectories for an equation of motion.
#[derive(Clone, Debug, Default)]
pub struct TrajectorySolver {
    pub options: SolverOptions,
}

impl TrajectorySolver {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Solve `I θ'' + c θ' + k (θ - θ_eq) = 0` from `(theta0, omega0)` over
    /// `duration_s`, sampled at `sample_rate_hz`.
    ///
    /// The result has exactly `round(duration_s * sample_rate_hz)` samples.
    /// Identical inputs give bit-identical output.
    pub fn solve(
        &self,
        eom: &EquationOfMotion,
        theta0_deg: f64,
        omega0_deg_s: f64,
        duration_s: f64,
        sample_rate_hz: f64,
    ) -> SimResult<Trajectory> {
        if !(theta0_deg.is_finite() && omega0_deg_s.is_finite()) {
            return Err(SimError::InvalidParameter {
                what: "initial angle and rate must be finite",
            });
        }
        let t_eval = sample_times(duration_s, sample_rate_hz)?;
        let mut model = OscillatorModel::new(*eom, theta0_deg, omega0_deg_s);

        let (states, stats) = integrate_at(&mut model, &DormandPrince45, &t_eval, &self.options)?;
        debug!(
            accepted = stats.accepted_steps,
            rejected = stats.rejected_steps,
            rhs_evals = stats.rhs_evals,
            "trajectory integration finished"
        );

        let samples = t_eval
            .iter()
            .zip(&states)
            .map(|(&time_s, x)| Sample {
                time_s,
                angle_deg: x[0],
            })
            .collect();
        let trajectory = Trajectory::from_samples(samples)?;
        info!(
            samples = trajectory.len(),
            theta0_deg,
            final_deg = trajectory.last().map(|s| s.angle_deg),
            "trajectory solved"
        );
        Ok(trajectory)
    }
}
