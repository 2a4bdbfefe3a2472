//! fb-core: shared foundation for the four-bar simulation workspace.
//!
//! Contains:
//! - units (uom SI types, constructors, degree/radian conversion)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{FbError, FbResult};
pub use numeric::*;
pub use units::*;
