//! The three moving links of a four-bar mechanism.

use crate::error::{GeometryError, GeometryResult};
use crate::link::{LinkGeometry, LinkRole};

/// Lengths of input, coupler and output links.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkLengths {
    pub input: f64,
    pub coupler: f64,
    pub output: f64,
}

impl LinkLengths {
    pub fn new(input: f64, coupler: f64, output: f64) -> Self {
        Self {
            input,
            coupler,
            output,
        }
    }

    pub fn get(&self, role: LinkRole) -> f64 {
        match role {
            LinkRole::Input => self.input,
            LinkRole::Coupler => self.coupler,
            LinkRole::Output => self.output,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.input, self.coupler, self.output]
    }
}

/// Input, coupler and output link geometry.
///
/// The ground link is implicit: it runs between the input and output pivots.
#[derive(Clone, Debug, PartialEq)]
pub struct Linkage {
    pub input: LinkGeometry,
    pub coupler: LinkGeometry,
    pub output: LinkGeometry,
}

impl Linkage {
    pub fn new(input: LinkGeometry, coupler: LinkGeometry, output: LinkGeometry) -> Self {
        Self {
            input,
            coupler,
            output,
        }
    }

    pub fn link(&self, role: LinkRole) -> &LinkGeometry {
        match role {
            LinkRole::Input => &self.input,
            LinkRole::Coupler => &self.coupler,
            LinkRole::Output => &self.output,
        }
    }

    pub fn link_mut(&mut self, role: LinkRole) -> &mut LinkGeometry {
        match role {
            LinkRole::Input => &mut self.input,
            LinkRole::Coupler => &mut self.coupler,
            LinkRole::Output => &mut self.output,
        }
    }

    pub fn lengths(&self) -> LinkLengths {
        LinkLengths::new(self.input.length, self.coupler.length, self.output.length)
    }

    /// Change one link's length, keeping its pivot and angle.
    pub fn set_length(&mut self, role: LinkRole, length: f64) -> GeometryResult<()> {
        if !(length.is_finite() && length > 0.0) {
            return Err(GeometryError::InvalidLength { role, length });
        }
        let link = self.link_mut(role);
        link.length = length;
        let angle = link.angle;
        link.set_angle(angle);
        Ok(())
    }
}
