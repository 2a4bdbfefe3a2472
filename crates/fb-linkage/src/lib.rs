//! Planar four-bar linkage geometry model and the narrow interfaces the
//! simulation core uses to talk to the outside world.
//!
//! Provides:
//! - `LinkGeometry` / `Linkage`: per-link length, pivot, endpoint and angle
//! - `LinkageGeometryPort`: the external position solver (loop closure)
//! - `LinkageView`: redraw and drag-enable signals for the renderer

pub mod error;
pub mod link;
pub mod linkage;
pub mod port;

pub use error::{GeometryError, GeometryResult};
pub use link::{LinkGeometry, LinkRole, Point2, endpoint_from};
pub use linkage::{LinkLengths, Linkage};
pub use port::{LinkageGeometryPort, LinkageView, NullView};
