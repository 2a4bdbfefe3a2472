//! Error types for simulation operations.

use fb_core::FbError;
use fb_linkage::GeometryError;
use thiserror::Error;

/// Errors encountered while building, solving or playing back a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Rejected input: non-positive mass or length, malformed bounds,
    /// bad horizon or sample rate.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// The integrator could not complete the horizon.
    #[error("Integration failed at t={t}: {what}")]
    Integration { what: &'static str, t: f64 },

    /// Raised by the external position solver, passed through untouched.
    #[error(transparent)]
    GeometryInfeasible(#[from] GeometryError),

    #[error("Playback is not running")]
    NotRunning,
}

pub type SimResult<T> = Result<T, SimError>;

impl From<FbError> for SimError {
    fn from(e: FbError) -> Self {
        match e {
            FbError::NonFinite { what, .. } | FbError::InvalidArg { what } => {
                SimError::InvalidParameter { what }
            }
        }
    }
}
