//! Spring-damper simulation core for a four-bar linkage input link.
//!
//! Provides:
//! - Validated physical parameters and angle bounds
//! - Equation-of-motion assembly (thin-rod inertia, torsional spring, damper)
//! - Adaptive Dormand-Prince integration resampled onto a fixed-rate trajectory
//! - Fixed-rate playback state machine
//! - The angle clamp controller, the only writer of the input angle

pub mod clamp;
pub mod eom;
pub mod error;
pub mod integrator;
pub mod model;
pub mod params;
pub mod playback;
pub mod sampled;
pub mod solver;
pub mod trajectory;

// Re-exports for public API
pub use clamp::AngleClampController;
pub use eom::{EQUILIBRIUM_ANGLE_DEG, EquationOfMotion, EquationOfMotionBuilder};
pub use error::{SimError, SimResult};
pub use integrator::{AdaptiveIntegrator, DormandPrince45, StepAttempt};
pub use model::{OscillatorModel, TransientModel};
pub use params::{AngleBounds, ParameterSet};
pub use playback::{PlaybackState, PlaybackStepper, TickOutcome};
pub use sampled::TickRate;
pub use solver::{SolveStats, SolverOptions, TrajectorySolver, integrate_at};
pub use trajectory::{Sample, Trajectory, sample_times};
