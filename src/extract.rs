//! Result extraction: nodal displacements and sampled member envelopes.

use crate::error::SolverResult;
use crate::model::FrameModel;

/// Number of evenly spaced sampling stations per member, from 0 to L
/// inclusive.
pub const ENVELOPE_STATIONS: usize = 21;

/// Members shorter than this are not sampled; their envelopes are zero.
const MIN_SAMPLING_LENGTH: f64 = 1e-6;

/// Maximum absolute internal forces across the sampling stations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceEnvelope {
    pub n: f64,
    pub vy: f64,
    pub vz: f64,
    pub t: f64,
    pub my: f64,
    pub mz: f64,
}

/// Everything the response reports for one member.
#[derive(Debug, Clone)]
pub struct MemberResults {
    /// Local end forces [Fx, Fy, Fz, Mx, My, Mz] at the i end.
    pub i_forces: [f64; 6],
    /// Local end forces at the j end.
    pub j_forces: [f64; 6],
    pub envelope: ForceEnvelope,
    pub dy_min: f64,
    pub dy_max: f64,
    pub dy_abs_max: f64,
}

/// Sample a member's internal-force functions at the envelope stations.
/// A sample that fails to evaluate is skipped rather than aborting the
/// member.
pub fn force_envelope(model: &FrameModel, member: &str, combo: &str) -> SolverResult<ForceEnvelope> {
    let length = model.member_length(member)?;
    if length < MIN_SAMPLING_LENGTH {
        return Ok(ForceEnvelope::default());
    }

    let mut env = ForceEnvelope::default();
    let step = length / (ENVELOPE_STATIONS - 1) as f64;
    for k in 0..ENVELOPE_STATIONS {
        let x = step * k as f64;
        let samples = [
            (model.member_axial(member, x, combo), &mut env.n),
            (model.member_shear_y(member, x, combo), &mut env.vy),
            (model.member_shear_z(member, x, combo), &mut env.vz),
            (model.member_torque(member, x, combo), &mut env.t),
            (model.member_moment_y(member, x, combo), &mut env.my),
            (model.member_moment_z(member, x, combo), &mut env.mz),
        ];
        for (sample, slot) in samples {
            if let Ok(value) = sample {
                if value.abs() > *slot {
                    *slot = value.abs();
                }
            }
        }
    }
    Ok(env)
}

/// Full per-member extraction: end forces, force envelope and local
/// vertical-deflection extremes.
pub fn member_results(model: &FrameModel, member: &str, combo: &str) -> SolverResult<MemberResults> {
    let forces = model.member_end_forces(member, combo)?;
    let mut i_forces = [0.0; 6];
    let mut j_forces = [0.0; 6];
    i_forces.copy_from_slice(&forces[..6]);
    j_forces.copy_from_slice(&forces[6..]);

    let envelope = force_envelope(model, member, combo)?;

    let length = model.member_length(member)?;
    let (dy_min, dy_max) = if length < MIN_SAMPLING_LENGTH {
        (0.0, 0.0)
    } else {
        model.member_deflection_y_extremes(member, combo)?
    };

    Ok(MemberResults {
        i_forces,
        j_forces,
        envelope,
        dy_min,
        dy_max,
        dy_abs_max: dy_min.abs().max(dy_max.abs()),
    })
}

/// The node with the strictly greatest Euclidean displacement magnitude.
/// `order` fixes which node wins a tie: the first maximum encountered.
pub fn max_displacement<'a, I>(
    model: &FrameModel,
    order: I,
    combo: &str,
) -> SolverResult<Option<(String, f64)>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(String, f64)> = None;
    for node in order {
        let d = model.node_displacement(node, combo)?;
        let magnitude = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        match &best {
            Some((_, value)) if magnitude <= *value => {}
            _ => best = Some((node.to_string(), magnitude)),
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Member, Section, Support};
    use crate::loads::{DistributedLoad, LoadDirection, NodeLoad};
    use crate::model::AnalysisOptions;
    use approx::assert_relative_eq;

    fn cantilever(length: f64) -> FrameModel {
        let mut model = FrameModel::new();
        model.add_node("N1", 0.0, 0.0, 0.0).unwrap();
        model.add_node("N2", length, 0.0, 0.0).unwrap();
        model
            .add_material("steel", Material::new(2.0e8, 8.0e7, 0.3, 76.8))
            .unwrap();
        model
            .add_section("sec", Section::new(0.01, 1.0e-5, 1.0e-5, 2.0e-5))
            .unwrap();
        model
            .add_member("M1", Member::new("N1", "N2", "steel", "sec"))
            .unwrap();
        model.def_support("N1", Support::fixed()).unwrap();
        model
    }

    #[test]
    fn tip_point_load_envelope_hits_p_times_l() {
        let mut model = cantilever(2.5);
        model
            .add_node_load("N2", NodeLoad::fy(-12.0, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        let env = force_envelope(&model, "M1", "Combo 1").unwrap();
        assert_relative_eq!(env.mz, 12.0 * 2.5, max_relative = 1e-9);
        assert_relative_eq!(env.vy, 12.0, max_relative = 1e-9);
        assert_relative_eq!(env.n, 0.0, epsilon = 1e-9);
        assert_relative_eq!(env.t, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn uniform_load_envelope_stays_below_continuous_maximum() {
        let mut model = cantilever(3.0);
        model
            .add_member_dist_load(
                "M1",
                DistributedLoad::new(-10.0, LoadDirection::FY, "Case 1"),
            )
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        let env = force_envelope(&model, "M1", "Combo 1").unwrap();
        let exact = 10.0 * 3.0 * 3.0 / 2.0;
        assert_relative_eq!(env.mz, exact, max_relative = 1e-9);
        assert!(env.mz <= exact * (1.0 + 1e-9));

        let results = member_results(&model, "M1", "Combo 1").unwrap();
        assert_relative_eq!(results.i_forces[1].abs(), 30.0, max_relative = 1e-9);
        assert_relative_eq!(
            results.dy_abs_max,
            10.0 * 81.0 / (8.0 * 2.0e8 * 1.0e-5),
            max_relative = 1e-9
        );
        assert!(results.dy_min < 0.0);
        assert_relative_eq!(results.dy_max, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn max_displacement_prefers_first_on_ties() {
        let mut model = cantilever(2.0);
        model
            .add_node_load("N2", NodeLoad::fy(-10.0, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        let (node, value) =
            max_displacement(&model, ["N1", "N2"], "Combo 1").unwrap().unwrap();
        assert_eq!(node, "N2");
        assert!(value > 0.0);

        // The fixed node displaces 0.0; a lone zero still wins.
        let (node, value) = max_displacement(&model, ["N1"], "Combo 1").unwrap().unwrap();
        assert_eq!(node, "N1");
        assert_eq!(value, 0.0);
    }
}
