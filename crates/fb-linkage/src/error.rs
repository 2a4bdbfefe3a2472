//! Geometry errors.

use crate::link::LinkRole;
use thiserror::Error;

/// Errors raised by the linkage model or the external position solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The position solver found no assembly for the requested input
    /// (mechanism locked or links cannot close the loop).
    #[error("Geometry infeasible: {reason}")]
    Infeasible { reason: String },

    #[error("Invalid length for {role} link: {length}")]
    InvalidLength { role: LinkRole, length: f64 },

    #[error("Non-finite geometry value for {what}")]
    NonFinite { what: &'static str },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
