//! Shared application service layer for the four-bar simulator.
//!
//! This crate gives the CLI (and any future GUI) one interface for project
//! management, parameter edits, simulation and playback.

pub mod error;
pub mod headless;
pub mod project_service;
pub mod runtime_compile;
pub mod session;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use headless::{DetachedGeometryPort, Pacing, PlaybackReport, drive_playback};
pub use project_service::{
    ProjectSummary, load_project, save_project, summarize, validate_project,
};
pub use runtime_compile::{build_linkage, build_parameters, build_solver};
pub use session::{LinkageSession, SimulationSettings};
