use crate::{FbError, FbResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Error weight for a component whose magnitude is `scale`.
    pub fn weight(&self, scale: Real) -> Real {
        self.abs + self.rel * scale.abs()
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> FbResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FbError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> FbResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(FbError::InvalidArg { what })
    }
}

/// Finite and >= 0.
pub fn ensure_non_negative(v: Real, what: &'static str) -> FbResult<Real> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(FbError::InvalidArg { what })
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: Real) -> Real {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
