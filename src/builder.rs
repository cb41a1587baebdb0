//! Build a [`FrameModel`] from a validated request and a stabilization
//! profile.

use crate::elements::{Material, Member, Releases, Section, Support};
use crate::error::SolverResult;
use crate::escalation::StabilizationProfile;
use crate::loads::{DistributedLoad, LoadCombination, LoadDirection};
use crate::model::FrameModel;
use crate::request::{AnalyzeRequest, MemberKind, UdlDirection};

/// Poisson's ratio assumed for all members; only E and G enter the
/// stiffness, so this is informational.
const POISSON_RATIO: f64 = 0.3;

/// Steel unit weight in kN/m^3, used for self-weight loading.
const STEEL_UNIT_WEIGHT: f64 = 76.8;

/// Stiffness of the stabilizing ground springs, small enough not to
/// disturb a well-posed model.
const GROUND_SPRING_STIFFNESS: f64 = 1e-2;

/// Self-weight factors below this are treated as zero.
const SELFWEIGHT_TOLERANCE: f64 = 1e-12;

impl From<UdlDirection> for LoadDirection {
    fn from(dir: UdlDirection) -> Self {
        match dir {
            UdlDirection::Gx => LoadDirection::FX,
            UdlDirection::Gy => LoadDirection::FY,
            UdlDirection::Gz => LoadDirection::FZ,
        }
    }
}

/// Translate the request into a fresh solver model, applying whatever
/// stabilization the profile asks for. The request must already be
/// validated; solver-level errors here indicate a bug in validation.
pub fn build_model(req: &AnalyzeRequest, profile: &StabilizationProfile) -> SolverResult<FrameModel> {
    let mut model = FrameModel::new();

    for node in &req.nodes {
        model.add_node(&node.id, node.x, node.y, node.z)?;
    }

    for support in &req.supports {
        let fix = &support.fix;
        let mut s = Support::new(fix.dx, fix.dy, fix.dz, fix.rx, fix.ry, fix.rz);
        if profile.force_fixed_rotations {
            s = s.with_fixed_rotations();
        }
        model.def_support(&support.node_id, s)?;
    }

    for member in &req.members {
        let material = format!("mat_{}", member.id);
        let section = format!("sec_{}", member.id);
        model.add_material(
            &material,
            Material::new(member.e, member.g, POISSON_RATIO, STEEL_UNIT_WEIGHT),
        )?;
        model.add_section(
            &section,
            Section::new(member.a, member.iy, member.iz, member.jx),
        )?;

        // Truss members are pin-ended no matter what releases were sent.
        let releases = match member.kind {
            MemberKind::Truss => Releases::all_rotational(),
            MemberKind::Frame => member
                .releases
                .map(|r| Releases::rotational(r.rxi, r.ryi, r.rzi, r.rxj, r.ryj, r.rzj))
                .unwrap_or_else(Releases::none),
        };

        model.add_member(
            &member.id,
            Member::new(&member.i, &member.j, &material, &section).with_releases(releases),
        )?;
    }

    if profile.ground_springs {
        for node in &req.nodes {
            model.def_support_spring(&node.id, GROUND_SPRING_STIFFNESS)?;
        }
    }

    for case in &req.cases {
        if case.selfweight_y.abs() > SELFWEIGHT_TOLERANCE {
            // Self-weight on an empty model is not worth failing the solve.
            if let Err(e) =
                model.add_member_self_weight(LoadDirection::FY, case.selfweight_y, &case.name)
            {
                log::warn!("skipping self-weight for case '{}': {e}", case.name);
            }
        }
        for udl in &case.member_udl {
            model.add_member_dist_load(
                &udl.member_id,
                DistributedLoad::new(udl.w, udl.dir.into(), &case.name),
            )?;
        }
    }

    for combo in &req.combos {
        let mut c = LoadCombination::new(&combo.name);
        for (case, &factor) in &combo.factors {
            c = c.with_case(case, factor);
        }
        model.add_load_combo(c)?;
    }

    Ok(model)
}
