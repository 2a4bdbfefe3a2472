//! Physical parameters and angular bounds for a simulation run.

use fb_core::{ensure_finite, ensure_non_negative, ensure_positive};

use crate::error::{SimError, SimResult};

/// Default mass of each link (kg).
pub const DEFAULT_MASS_KG: f64 = 1.0;
/// Default torsional spring stiffness (N·m/rad).
pub const DEFAULT_SPRING_STIFFNESS: f64 = 50.0;
/// Default viscous damping coefficient (N·m·s/rad).
pub const DEFAULT_DAMPING_COEFFICIENT: f64 = 5.0;

/// Lowest admissible bound (degrees).
pub const ANGLE_LIMIT_MIN_DEG: f64 = 0.0;
/// Highest admissible bound (degrees).
pub const ANGLE_LIMIT_MAX_DEG: f64 = 360.0;

/// Hard limits on the input link angle, in degrees.
///
/// Always satisfies `0 <= min <= max <= 360`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleBounds {
    min_deg: f64,
    max_deg: f64,
}

impl Default for AngleBounds {
    fn default() -> Self {
        Self::full()
    }
}

impl AngleBounds {
    /// Create bounds, rejecting inverted or out-of-range limits.
    pub fn new(min_deg: f64, max_deg: f64) -> SimResult<Self> {
        let min_deg = ensure_finite(min_deg, "angle_min must be finite")?;
        let max_deg = ensure_finite(max_deg, "angle_max must be finite")?;
        if !(ANGLE_LIMIT_MIN_DEG..=ANGLE_LIMIT_MAX_DEG).contains(&min_deg) {
            return Err(SimError::InvalidParameter {
                what: "angle_min must lie in [0, 360] degrees",
            });
        }
        if !(ANGLE_LIMIT_MIN_DEG..=ANGLE_LIMIT_MAX_DEG).contains(&max_deg) {
            return Err(SimError::InvalidParameter {
                what: "angle_max must lie in [0, 360] degrees",
            });
        }
        if min_deg > max_deg {
            return Err(SimError::InvalidParameter {
                what: "angle_min must not exceed angle_max",
            });
        }
        Ok(Self { min_deg, max_deg })
    }

    /// The whole circle, `[0, 360]`.
    pub const fn full() -> Self {
        Self {
            min_deg: ANGLE_LIMIT_MIN_DEG,
            max_deg: ANGLE_LIMIT_MAX_DEG,
        }
    }

    pub fn min_deg(&self) -> f64 {
        self.min_deg
    }

    pub fn max_deg(&self) -> f64 {
        self.max_deg
    }

    pub fn contains(&self, deg: f64) -> bool {
        (self.min_deg..=self.max_deg).contains(&deg)
    }

    /// Enforce the bounds on a proposed angle.
    ///
    /// In-range values come back unchanged, so `clamp(clamp(x)) == clamp(x)`.
    pub fn clamp(&self, proposed_deg: f64) -> f64 {
        if proposed_deg < self.min_deg {
            self.min_deg
        } else if proposed_deg > self.max_deg {
            self.max_deg
        } else {
            proposed_deg
        }
    }

    /// Replace the lower bound.
    ///
    /// The value is pulled into `[0, 360]`; a value above the current upper
    /// bound is lowered to it, so an edit can never invert the bounds.
    pub fn with_min(self, min_deg: f64) -> SimResult<Self> {
        let min_deg = ensure_finite(min_deg, "angle_min must be finite")?;
        let min_deg = min_deg
            .clamp(ANGLE_LIMIT_MIN_DEG, ANGLE_LIMIT_MAX_DEG)
            .min(self.max_deg);
        Ok(Self { min_deg, ..self })
    }

    /// Replace the upper bound, raising it to the lower bound if needed.
    pub fn with_max(self, max_deg: f64) -> SimResult<Self> {
        let max_deg = ensure_finite(max_deg, "angle_max must be finite")?;
        let max_deg = max_deg
            .clamp(ANGLE_LIMIT_MIN_DEG, ANGLE_LIMIT_MAX_DEG)
            .max(self.min_deg);
        Ok(Self { max_deg, ..self })
    }
}

/// Masses, spring, damper and bounds for one simulation run.
///
/// Every constructor and mutator validates; a failed mutation leaves the set
/// unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    masses: [f64; 3],
    spring_stiffness: f64,
    damping_coefficient: f64,
    bounds: AngleBounds,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            masses: [DEFAULT_MASS_KG; 3],
            spring_stiffness: DEFAULT_SPRING_STIFFNESS,
            damping_coefficient: DEFAULT_DAMPING_COEFFICIENT,
            bounds: AngleBounds::full(),
        }
    }
}

impl ParameterSet {
    /// # Arguments
    /// * `masses` - input, coupler and output link masses (kg), each > 0
    /// * `spring_stiffness` - torsional stiffness (N·m/rad), >= 0
    /// * `damping_coefficient` - viscous damping (N·m·s/rad), >= 0
    /// * `bounds` - input angle limits
    pub fn new(
        masses: [f64; 3],
        spring_stiffness: f64,
        damping_coefficient: f64,
        bounds: AngleBounds,
    ) -> SimResult<Self> {
        Ok(Self {
            masses: validate_masses(masses)?,
            spring_stiffness: ensure_non_negative(
                spring_stiffness,
                "spring stiffness must be finite and non-negative",
            )?,
            damping_coefficient: ensure_non_negative(
                damping_coefficient,
                "damping coefficient must be finite and non-negative",
            )?,
            bounds,
        })
    }

    pub fn masses(&self) -> [f64; 3] {
        self.masses
    }

    pub fn spring_stiffness(&self) -> f64 {
        self.spring_stiffness
    }

    pub fn damping_coefficient(&self) -> f64 {
        self.damping_coefficient
    }

    pub fn bounds(&self) -> AngleBounds {
        self.bounds
    }

    pub fn set_masses(&mut self, masses: [f64; 3]) -> SimResult<()> {
        self.masses = validate_masses(masses)?;
        Ok(())
    }

    pub fn set_spring_stiffness(&mut self, k: f64) -> SimResult<()> {
        self.spring_stiffness =
            ensure_non_negative(k, "spring stiffness must be finite and non-negative")?;
        Ok(())
    }

    pub fn set_damping_coefficient(&mut self, c: f64) -> SimResult<()> {
        self.damping_coefficient =
            ensure_non_negative(c, "damping coefficient must be finite and non-negative")?;
        Ok(())
    }

    /// Edit the lower bound; see [`AngleBounds::with_min`].
    pub fn set_angle_min(&mut self, min_deg: f64) -> SimResult<AngleBounds> {
        self.bounds = self.bounds.with_min(min_deg)?;
        Ok(self.bounds)
    }

    /// Edit the upper bound; see [`AngleBounds::with_max`].
    pub fn set_angle_max(&mut self, max_deg: f64) -> SimResult<AngleBounds> {
        self.bounds = self.bounds.with_max(max_deg)?;
        Ok(self.bounds)
    }
}

fn validate_masses(masses: [f64; 3]) -> SimResult<[f64; 3]> {
    for m in masses {
        ensure_positive(m, "link masses must be finite and positive")?;
    }
    Ok(masses)
}
