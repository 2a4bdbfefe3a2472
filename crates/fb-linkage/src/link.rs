//! Single rigid link: pivot, length, angle and derived endpoint.

use core::fmt;

use fb_core::{normalize_deg, rad_to_deg};
use nalgebra::Vector2;

use crate::error::{GeometryError, GeometryResult};

/// Scene coordinates. The y axis points down, as on a raster canvas.
pub type Point2 = nalgebra::Point2<f64>;

/// Which of the three moving links a geometry record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkRole {
    /// The driven link; its angle is the single degree of freedom.
    Input,
    /// The coupler (drag) link joining input and output.
    Coupler,
    /// The follower link.
    Output,
}

impl LinkRole {
    pub const ALL: [LinkRole; 3] = [LinkRole::Input, LinkRole::Coupler, LinkRole::Output];
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkRole::Input => "input",
            LinkRole::Coupler => "coupler",
            LinkRole::Output => "output",
        };
        f.write_str(name)
    }
}

/// `start + length * (cos θ, -sin θ)`.
///
/// Angles are measured counter-clockwise on screen, hence the negated y term.
pub fn endpoint_from(start: Point2, length: f64, angle_rad: f64) -> Point2 {
    start + Vector2::new(angle_rad.cos(), -angle_rad.sin()) * length
}

/// Geometry of one link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkGeometry {
    pub length: f64,
    pub start: Point2,
    pub end: Point2,
    /// Radians.
    pub angle: f64,
}

impl LinkGeometry {
    /// Build a link from its pivot, length and angle; the endpoint is derived.
    pub fn new(role: LinkRole, start: Point2, length: f64, angle_rad: f64) -> GeometryResult<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(GeometryError::InvalidLength { role, length });
        }
        if !(start.x.is_finite() && start.y.is_finite()) {
            return Err(GeometryError::NonFinite { what: "link start" });
        }
        if !angle_rad.is_finite() {
            return Err(GeometryError::NonFinite { what: "link angle" });
        }
        Ok(Self {
            length,
            start,
            end: endpoint_from(start, length, angle_rad),
            angle: angle_rad,
        })
    }

    /// Angle in degrees, wrapped into `[0, 360)`.
    pub fn angle_deg(&self) -> f64 {
        normalize_deg(rad_to_deg(self.angle))
    }

    /// Set the angle and recompute the endpoint from the current pivot and length.
    pub fn set_angle(&mut self, angle_rad: f64) {
        self.angle = angle_rad;
        self.end = endpoint_from(self.start, self.length, angle_rad);
    }

    /// Angle that the segment `start -> target` makes, in degrees within `[0, 360)`.
    pub fn angle_towards_deg(&self, target: Point2) -> f64 {
        let d = target - self.start;
        normalize_deg(rad_to_deg((-d.y).atan2(d.x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::deg_to_rad;

    fn close(a: Point2, b: Point2) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn endpoint_points_up_at_ninety_degrees() {
        let end = endpoint_from(Point2::new(1.0, 2.0), 3.0, deg_to_rad(90.0));
        assert!(close(end, Point2::new(1.0, -1.0)));
    }

    #[test]
    fn endpoint_at_zero_degrees_is_along_x() {
        let end = endpoint_from(Point2::origin(), 2.0, 0.0);
        assert!(close(end, Point2::new(2.0, 0.0)));
    }

    #[test]
    fn rejects_non_positive_length() {
        let err = LinkGeometry::new(LinkRole::Output, Point2::origin(), 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidLength {
                role: LinkRole::Output,
                length: 0.0
            }
        );
    }

    #[test]
    fn set_angle_moves_endpoint() {
        let mut link = LinkGeometry::new(LinkRole::Input, Point2::origin(), 1.0, 0.0).unwrap();
        link.set_angle(deg_to_rad(180.0));
        assert!(close(link.end, Point2::new(-1.0, 0.0)));
        assert!((link.angle_deg() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn angle_towards_uses_screen_orientation() {
        let link = LinkGeometry::new(LinkRole::Input, Point2::origin(), 1.0, 0.0).unwrap();
        // y down on screen: a point above the pivot is at 90 degrees
        assert!((link.angle_towards_deg(Point2::new(0.0, -5.0)) - 90.0).abs() < 1e-9);
        assert!((link.angle_towards_deg(Point2::new(0.0, 5.0)) - 270.0).abs() < 1e-9);
    }
}
