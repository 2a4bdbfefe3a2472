//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files stored bounds that could be inverted; v1 requires
/// `angle_min_deg <= angle_max_deg`.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    let p = &mut project.parameters;
    if p.angle_min_deg > p.angle_max_deg {
        std::mem::swap(&mut p.angle_min_deg, &mut p.angle_max_deg);
    }
    project.version = 1;
    Ok(project)
}
