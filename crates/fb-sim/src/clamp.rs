//! The single writer of the input link angle.
//!
//! Every angle change goes through [`AngleClampController::set_input_angle_deg`]:
//! pointer drags, bound edits and playback ticks alike. The controller owns
//! the linkage model, so the angle it reports and the geometry the view draws
//! cannot drift apart.

use fb_core::deg_to_rad;
use fb_linkage::{
    GeometryError, GeometryResult, LinkGeometry, LinkLengths, LinkRole, Linkage,
    LinkageGeometryPort, LinkageView, Point2,
};
use tracing::debug;

use crate::params::AngleBounds;

pub struct AngleClampController<P, V> {
    linkage: Linkage,
    /// Authoritative input angle, degrees.
    angle_deg: f64,
    bounds: AngleBounds,
    drag_enabled: bool,
    port: P,
    view: V,
}

impl<P: LinkageGeometryPort, V: LinkageView> AngleClampController<P, V> {
    /// Take ownership of the linkage model. The current input angle is
    /// adopted as is; call [`Self::enforce_bounds`] to bring it into range.
    pub fn new(linkage: Linkage, bounds: AngleBounds, port: P, view: V) -> Self {
        let angle_deg = linkage.input.angle_deg();
        Self {
            linkage,
            angle_deg,
            bounds,
            drag_enabled: true,
            port,
            view,
        }
    }

    /// Like [`Self::new`], but the authoritative angle is `angle_deg` as
    /// given rather than the link angle wrapped into `[0, 360)`. The input
    /// link is turned to match. A linkage stored at 360 degrees stays there.
    pub fn with_input_angle_deg(
        mut linkage: Linkage,
        angle_deg: f64,
        bounds: AngleBounds,
        port: P,
        view: V,
    ) -> GeometryResult<Self> {
        if !angle_deg.is_finite() {
            return Err(GeometryError::NonFinite {
                what: "initial input angle",
            });
        }
        linkage.input.set_angle(deg_to_rad(angle_deg));
        let mut controller = Self::new(linkage, bounds, port, view);
        controller.angle_deg = angle_deg;
        Ok(controller)
    }

    /// Propose a new input angle (degrees) and return the enforced one.
    ///
    /// Out-of-range proposals snap to the violated bound. When the enforced
    /// angle equals the current one nothing is touched: no geometry solve, no
    /// redraw. Otherwise the input endpoint is recomputed, the external solver
    /// places the dependent links and the view is told to redraw.
    ///
    /// # Errors
    /// Non-finite proposals and solver failures. The model is left unchanged
    /// on error.
    pub fn set_input_angle_deg(&mut self, proposed_deg: f64) -> GeometryResult<f64> {
        if !proposed_deg.is_finite() {
            return Err(GeometryError::NonFinite {
                what: "proposed input angle",
            });
        }
        self.apply_within(self.bounds, proposed_deg)
    }

    /// Re-run the clamp on the current angle.
    pub fn enforce_bounds(&mut self) -> GeometryResult<f64> {
        self.set_input_angle_deg(self.angle_deg)
    }

    /// Replace the bounds and pull the current angle inside them.
    ///
    /// The bounds are committed only once the angle is inside them; on a
    /// solver failure both bounds and model stay as they were.
    pub fn set_bounds(&mut self, bounds: AngleBounds) -> GeometryResult<f64> {
        let enforced = self.apply_within(bounds, self.angle_deg)?;
        self.bounds = bounds;
        Ok(enforced)
    }

    /// Direct manipulation: aim the input link at `pointer`.
    ///
    /// Returns `None` without touching anything while dragging is disabled.
    pub fn drag_input_to(&mut self, pointer: Point2) -> GeometryResult<Option<f64>> {
        if !self.drag_enabled {
            return Ok(None);
        }
        if !(pointer.x.is_finite() && pointer.y.is_finite()) {
            return Err(GeometryError::NonFinite { what: "drag pointer" });
        }
        let mut proposed = self.linkage.input.angle_towards_deg(pointer);
        // pointing along +x is both 0 and 360
        if !self.bounds.contains(proposed) && self.bounds.contains(proposed + 360.0) {
            proposed += 360.0;
        }
        self.set_input_angle_deg(proposed).map(Some)
    }

    /// Change a link length and re-solve the dependent geometry.
    pub fn set_link_length(&mut self, role: LinkRole, length: f64) -> GeometryResult<()> {
        let mut candidate = self.linkage.clone();
        candidate.set_length(role, length)?;
        self.resolve(candidate)
    }

    /// Record whether direct manipulation is allowed and forward it to the view.
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.drag_enabled = enabled;
        self.view.set_drag_enabled(enabled);
    }

    /// Ask the view to redraw without changing geometry.
    pub fn refresh_view(&mut self) {
        self.view.geometry_changed();
    }

    pub fn input_angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn output_angle_deg(&self) -> f64 {
        self.linkage.output.angle_deg()
    }

    pub fn bounds(&self) -> AngleBounds {
        self.bounds
    }

    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    pub fn linkage(&self) -> &Linkage {
        &self.linkage
    }

    pub fn link_lengths(&self) -> LinkLengths {
        self.linkage.lengths()
    }

    pub fn input_link(&self) -> &LinkGeometry {
        &self.linkage.input
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Clamp `proposed_deg` into `bounds` and commit it unless it is the
    /// current angle.
    fn apply_within(&mut self, bounds: AngleBounds, proposed_deg: f64) -> GeometryResult<f64> {
        let enforced = bounds.clamp(proposed_deg);
        if enforced != proposed_deg {
            debug!(
                proposed_deg,
                enforced_deg = enforced,
                min_deg = bounds.min_deg(),
                max_deg = bounds.max_deg(),
                "input angle clamped"
            );
        }
        if enforced == self.angle_deg {
            return Ok(enforced);
        }

        let mut candidate = self.linkage.clone();
        candidate.input.set_angle(deg_to_rad(enforced));
        self.resolve(candidate)?;
        self.angle_deg = enforced;
        Ok(enforced)
    }

    /// Hand `candidate` (input link already updated) to the solver and commit.
    fn resolve(&mut self, candidate: Linkage) -> GeometryResult<()> {
        let mut solved = self
            .port
            .compute_from_input_endpoint(&candidate, candidate.input.end)?;
        // the input link is ours; the solver only places the others
        solved.input = candidate.input;
        self.linkage = solved;
        self.view.geometry_changed();
        Ok(())
    }
}
