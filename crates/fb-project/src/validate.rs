//! Project validation logic.

use crate::schema::{IntegratorDef, LinkDef, LinkageDef, ParameterDef, Project, SimulationDef};

/// Gap allowed between the input endpoint and the coupler pivot.
const JOINT_TOLERANCE: f64 = 1e-6;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if project.name.trim().is_empty() {
        return Err(invalid("name", &project.name, "must not be empty"));
    }

    validate_linkage(&project.linkage)?;
    validate_parameters(&project.parameters)?;
    validate_simulation(&project.simulation)?;

    Ok(())
}

fn validate_linkage(linkage: &LinkageDef) -> Result<(), ValidationError> {
    validate_link("linkage.input", &linkage.input)?;
    validate_link("linkage.coupler", &linkage.coupler)?;
    validate_link("linkage.output", &linkage.output)?;

    let angle = linkage.input.angle_deg.to_radians();
    let end = [
        linkage.input.start[0] + linkage.input.length * angle.cos(),
        linkage.input.start[1] - linkage.input.length * angle.sin(),
    ];
    let gap = (end[0] - linkage.coupler.start[0]).hypot(end[1] - linkage.coupler.start[1]);
    let scale = linkage.input.length.max(1.0);
    if gap > JOINT_TOLERANCE * scale {
        return Err(invalid(
            "linkage.coupler.start",
            format!("{:?}", linkage.coupler.start),
            "must coincide with the input link endpoint",
        ));
    }

    Ok(())
}

fn validate_link(field: &str, link: &LinkDef) -> Result<(), ValidationError> {
    if !(link.start[0].is_finite() && link.start[1].is_finite()) {
        return Err(invalid(
            &format!("{field}.start"),
            format!("{:?}", link.start),
            "must be finite",
        ));
    }
    if !(link.length.is_finite() && link.length > 0.0) {
        return Err(invalid(
            &format!("{field}.length"),
            link.length,
            "must be finite and positive",
        ));
    }
    if !link.angle_deg.is_finite() {
        return Err(invalid(
            &format!("{field}.angle_deg"),
            link.angle_deg,
            "must be finite",
        ));
    }
    Ok(())
}

fn validate_parameters(p: &ParameterDef) -> Result<(), ValidationError> {
    for (i, m) in p.masses_kg.iter().enumerate() {
        if !(m.is_finite() && *m > 0.0) {
            return Err(invalid(
                &format!("parameters.masses_kg[{i}]"),
                m,
                "must be finite and positive",
            ));
        }
    }
    non_negative("parameters.spring_stiffness", p.spring_stiffness)?;
    non_negative("parameters.damping_coefficient", p.damping_coefficient)?;

    for (field, v) in [
        ("parameters.angle_min_deg", p.angle_min_deg),
        ("parameters.angle_max_deg", p.angle_max_deg),
    ] {
        if !(v.is_finite() && (0.0..=360.0).contains(&v)) {
            return Err(invalid(field, v, "must lie in [0, 360]"));
        }
    }
    if p.angle_min_deg > p.angle_max_deg {
        return Err(invalid(
            "parameters.angle_min_deg",
            p.angle_min_deg,
            "must not exceed angle_max_deg",
        ));
    }
    Ok(())
}

fn validate_simulation(s: &SimulationDef) -> Result<(), ValidationError> {
    positive("simulation.duration_s", s.duration_s)?;
    positive("simulation.sample_rate_hz", s.sample_rate_hz)?;
    if (s.duration_s * s.sample_rate_hz).round() < 1.0 {
        return Err(invalid(
            "simulation.sample_rate_hz",
            s.sample_rate_hz,
            "duration * rate must round to at least one sample",
        ));
    }
    if !s.initial_rate_deg_s.is_finite() {
        return Err(invalid(
            "simulation.initial_rate_deg_s",
            s.initial_rate_deg_s,
            "must be finite",
        ));
    }
    validate_integrator(&s.integrator)
}

fn validate_integrator(i: &IntegratorDef) -> Result<(), ValidationError> {
    positive("simulation.integrator.abs_tol", i.abs_tol)?;
    non_negative("simulation.integrator.rel_tol", i.rel_tol)?;
    if i.max_steps == 0 {
        return Err(invalid(
            "simulation.integrator.max_steps",
            i.max_steps,
            "must be positive",
        ));
    }
    Ok(())
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite and positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite and non-negative"))
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidValue { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_project_is_valid() {
        validate_project(&Project::new("Four-bar")).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut project = Project::new("future");
        project.version = crate::migrate::LATEST_VERSION + 1;
        assert!(matches!(
            validate_project(&project),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut project = Project::new("p");
        project.parameters.masses_kg[1] = 0.0;
        let err = validate_project(&project).unwrap_err();
        assert_eq!(field_of(err), "parameters.masses_kg[1]");
    }

    #[test]
    fn rejects_inverted_or_out_of_range_bounds() {
        let mut project = Project::new("p");
        project.parameters.angle_min_deg = 200.0;
        project.parameters.angle_max_deg = 100.0;
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "parameters.angle_min_deg"
        );

        project.parameters.angle_min_deg = 0.0;
        project.parameters.angle_max_deg = 400.0;
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "parameters.angle_max_deg"
        );
    }

    #[test]
    fn rejects_detached_coupler() {
        let mut project = Project::new("p");
        project.linkage.coupler.start = [0.5, -1.0];
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "linkage.coupler.start"
        );
    }

    #[test]
    fn rejects_bad_link_length() {
        let mut project = Project::new("p");
        project.linkage.output.length = -1.0;
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "linkage.output.length"
        );
    }

    #[test]
    fn rejects_empty_horizon() {
        let mut project = Project::new("p");
        project.simulation.duration_s = 0.001;
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "simulation.sample_rate_hz"
        );

        project.simulation.duration_s = 5.0;
        project.simulation.integrator.abs_tol = 0.0;
        assert_eq!(
            field_of(validate_project(&project).unwrap_err()),
            "simulation.integrator.abs_tol"
        );
    }

    #[test]
    fn zero_spring_is_allowed() {
        let mut project = Project::new("p");
        project.parameters.spring_stiffness = 0.0;
        project.parameters.damping_coefficient = 0.0;
        validate_project(&project).unwrap();
    }
}
