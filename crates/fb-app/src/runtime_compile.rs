//! Turn project definitions into runtime objects.

use fb_core::{Tolerances, deg_to_rad, rad_to_deg};
use fb_linkage::{LinkGeometry, LinkRole, Linkage, Point2};
use fb_project::schema::{IntegratorDef, LinkDef, LinkageDef, ParameterDef};
use fb_sim::{AngleBounds, ParameterSet, SolverOptions, TrajectorySolver};

use crate::error::AppResult;

/// Validated parameter set from its file form.
pub fn build_parameters(def: &ParameterDef) -> AppResult<ParameterSet> {
    let bounds = AngleBounds::new(def.angle_min_deg, def.angle_max_deg)?;
    let params = ParameterSet::new(
        def.masses_kg,
        def.spring_stiffness,
        def.damping_coefficient,
        bounds,
    )?;
    Ok(params)
}

fn build_link(role: LinkRole, def: &LinkDef) -> AppResult<LinkGeometry> {
    let link = LinkGeometry::new(
        role,
        Point2::new(def.start[0], def.start[1]),
        def.length,
        deg_to_rad(def.angle_deg),
    )?;
    Ok(link)
}

/// Linkage model with endpoints derived from pivot, length and angle.
pub fn build_linkage(def: &LinkageDef) -> AppResult<Linkage> {
    Ok(Linkage::new(
        build_link(LinkRole::Input, &def.input)?,
        build_link(LinkRole::Coupler, &def.coupler)?,
        build_link(LinkRole::Output, &def.output)?,
    ))
}

pub fn build_solver(def: &IntegratorDef) -> TrajectorySolver {
    TrajectorySolver::new(SolverOptions {
        tolerances: Tolerances {
            abs: def.abs_tol,
            rel: def.rel_tol,
        },
        max_steps: def.max_steps,
    })
}

fn link_def(link: &LinkGeometry) -> LinkDef {
    LinkDef {
        start: [link.start.x, link.start.y],
        length: link.length,
        angle_deg: rad_to_deg(link.angle),
    }
}

/// File form of a linkage model.
pub fn linkage_def(linkage: &Linkage) -> LinkageDef {
    LinkageDef {
        input: link_def(&linkage.input),
        coupler: link_def(&linkage.coupler),
        output: link_def(&linkage.output),
    }
}

pub fn parameter_def(params: &ParameterSet) -> ParameterDef {
    ParameterDef {
        masses_kg: params.masses(),
        spring_stiffness: params.spring_stiffness(),
        damping_coefficient: params.damping_coefficient(),
        angle_min_deg: params.bounds().min_deg(),
        angle_max_deg: params.bounds().max_deg(),
    }
}

pub fn integrator_def(solver: &TrajectorySolver) -> IntegratorDef {
    IntegratorDef {
        abs_tol: solver.options.tolerances.abs,
        rel_tol: solver.options.tolerances.rel,
        max_steps: solver.options.max_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn default_linkage_closes() {
        let linkage = build_linkage(&LinkageDef::default()).unwrap();
        assert!((linkage.input.end - linkage.coupler.start).norm() < 1e-12);
        assert!((linkage.coupler.end - linkage.output.end).norm() < 1e-12);
        assert!((linkage.input.angle_deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn parameters_roundtrip_through_file_form() {
        let def = ParameterDef {
            masses_kg: [2.0, 1.0, 3.0],
            spring_stiffness: 40.0,
            damping_coefficient: 2.0,
            angle_min_deg: 10.0,
            angle_max_deg: 170.0,
        };
        let params = build_parameters(&def).unwrap();
        assert_eq!(parameter_def(&params), def);
    }

    #[test]
    fn bad_definitions_are_reported() {
        let mut def = ParameterDef::default();
        def.masses_kg[2] = 0.0;
        assert!(matches!(
            build_parameters(&def),
            Err(AppError::Simulation(_))
        ));

        let mut linkage = LinkageDef::default();
        linkage.input.length = 0.0;
        assert!(matches!(build_linkage(&linkage), Err(AppError::Geometry(_))));
    }

    #[test]
    fn solver_settings_roundtrip() {
        let def = IntegratorDef {
            abs_tol: 1e-9,
            rel_tol: 1e-7,
            max_steps: 5000,
        };
        assert_eq!(integrator_def(&build_solver(&def)), def);
    }
}
