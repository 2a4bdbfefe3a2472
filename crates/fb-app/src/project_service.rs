//! Project loading, saving, validation, and introspection.

use std::path::Path;

use fb_project::schema::Project;

use crate::error::{AppError, AppResult};
use crate::runtime_compile;

/// Headline numbers for a project, as printed by `validate` and `eom`.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub version: u32,
    pub effective_inertia: f64,
    pub natural_frequency: f64,
    pub damping_ratio: f64,
    pub sample_count: usize,
    pub angle_bounds_deg: (f64, f64),
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load, migrate and validate a project from a YAML or JSON file.
pub fn load_project(path: &Path) -> AppResult<Project> {
    let project = match format_of(path)? {
        Format::Yaml => fb_project::load_yaml(path)?,
        Format::Json => fb_project::load_json(path)?,
    };
    Ok(project)
}

/// Save a project; the format follows the file extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    match format_of(path)? {
        Format::Yaml => fb_project::save_yaml(path, project)?,
        Format::Json => fb_project::save_json(path, project)?,
    }
    Ok(())
}

/// Validate the file schema and that the runtime objects can be built.
pub fn validate_project(project: &Project) -> AppResult<()> {
    fb_project::validate_project(project)?;
    runtime_compile::build_parameters(&project.parameters)?;
    runtime_compile::build_linkage(&project.linkage)?;
    Ok(())
}

pub fn summarize(project: &Project) -> AppResult<ProjectSummary> {
    let params = runtime_compile::build_parameters(&project.parameters)?;
    let linkage = runtime_compile::build_linkage(&project.linkage)?;
    let eom = fb_sim::EquationOfMotionBuilder::build(&params, linkage.lengths())?;
    let sim = &project.simulation;
    let sample_count = fb_sim::sample_times(sim.duration_s, sim.sample_rate_hz)?.len();

    Ok(ProjectSummary {
        name: project.name.clone(),
        version: project.version,
        effective_inertia: eom.effective_inertia,
        natural_frequency: eom.natural_frequency(),
        damping_ratio: eom.damping_ratio(),
        sample_count,
        angle_bounds_deg: (params.bounds().min_deg(), params.bounds().max_deg()),
    })
}
