//! Interfaces to the external position solver and renderer.

use crate::error::GeometryResult;
use crate::link::Point2;
use crate::linkage::Linkage;

/// The authoritative four-bar position solver.
///
/// Given the current linkage and a new endpoint for the input link, returns
/// geometry for all three links that closes the loop. Implementations live
/// outside the simulation core; the core never second-guesses the answer.
pub trait LinkageGeometryPort {
    /// Solve dependent link positions for the given input endpoint.
    ///
    /// # Errors
    /// `GeometryError::Infeasible` when no assembly exists (mechanism locked).
    fn compute_from_input_endpoint(
        &mut self,
        current: &Linkage,
        input_end: Point2,
    ) -> GeometryResult<Linkage>;
}

/// Signals consumed by whatever draws the linkage.
pub trait LinkageView {
    /// Geometry changed; redraw from the authoritative model.
    fn geometry_changed(&mut self);

    /// Enable or disable direct manipulation (dragging the input link).
    fn set_drag_enabled(&mut self, enabled: bool);
}

/// View that ignores every signal, for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

impl LinkageView for NullView {
    fn geometry_changed(&mut self) {}

    fn set_drag_enabled(&mut self, _enabled: bool) {}
}
