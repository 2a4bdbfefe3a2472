//! Error types for the fb-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Unsupported project file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<fb_project::ProjectError> for AppError {
    fn from(err: fb_project::ProjectError) -> Self {
        match err {
            fb_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<fb_project::ValidationError> for AppError {
    fn from(err: fb_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<fb_sim::SimError> for AppError {
    fn from(err: fb_sim::SimError) -> Self {
        match err {
            fb_sim::SimError::GeometryInfeasible(e) => AppError::Geometry(e.to_string()),
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<fb_linkage::GeometryError> for AppError {
    fn from(err: fb_linkage::GeometryError) -> Self {
        AppError::Geometry(err.to_string())
    }
}
