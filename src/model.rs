//! `FrameModel` - the linear-elastic 3D frame solver engine.
//!
//! The orchestration core builds one of these per solve attempt, calls
//! [`FrameModel::analyze`], and reads results back through the accessor
//! methods. Entities are registered incrementally by name; nothing is
//! shared between model instances.

use std::collections::HashMap;

use crate::elements::{Material, Member, Node, Releases, Section, Support};
use crate::error::{SolverError, SolverResult};
use crate::loads::{DistributedLoad, LoadCombination, LoadDirection, NodeLoad};
use crate::math::{self, CheckedLu, DVec, Mat, Mat3, Vec12};

/// DOF labels in partition order, for instability diagnostics.
const DOF_NAMES: [&str; 6] = ["DX", "DY", "DZ", "RX", "RY", "RZ"];

/// Diagonal stiffness below this is treated as a kinematic mechanism.
const STABILITY_DIAG_TOLERANCE: f64 = 1e-12;

/// Factors smaller than this contribute nothing to a combination.
const FACTOR_TOLERANCE: f64 = 1e-12;

/// Stations used by the engine-side deflection extremum query.
const DEFLECTION_SCAN_STATIONS: usize = 101;

/// Options controlling a solve.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// When true, a free DOF with no stiffness fails the solve with
    /// [`SolverError::Unstable`]; when false it is only logged. Stabilized
    /// (ground-spring) solves run with this off since the springs guarantee
    /// a definite system.
    pub check_stability: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            check_stability: true,
        }
    }
}

impl AnalysisOptions {
    /// Instability warnings promoted to hard failures.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Instability warnings suppressed.
    pub fn relaxed() -> Self {
        Self {
            check_stability: false,
        }
    }
}

/// The 3D frame model: registration, analysis, and result access.
#[derive(Debug, Clone, Default)]
pub struct FrameModel {
    pub nodes: HashMap<String, Node>,
    pub materials: HashMap<String, Material>,
    pub sections: HashMap<String, Section>,
    pub members: HashMap<String, Member>,
    pub supports: HashMap<String, Support>,

    /// Weak elastic ground-spring stiffness per node, applied uniformly to
    /// all six DOFs.
    springs: HashMap<String, f64>,

    node_loads: HashMap<String, Vec<NodeLoad>>,
    dist_loads: HashMap<String, Vec<DistributedLoad>>,
    combos: HashMap<String, LoadCombination>,

    // Registration order, so DOF numbering and assembly are deterministic.
    node_order: Vec<String>,
    member_order: Vec<String>,
    combo_order: Vec<String>,

    analyzed: bool,
}

impl FrameModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model building
    // ========================

    pub fn add_node(&mut self, name: &str, x: f64, y: f64, z: f64) -> SolverResult<()> {
        if self.nodes.contains_key(name) {
            return Err(SolverError::DuplicateName(name.to_string()));
        }
        self.nodes.insert(name.to_string(), Node::new(x, y, z));
        self.node_order.push(name.to_string());
        self.analyzed = false;
        Ok(())
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> SolverResult<()> {
        if self.materials.contains_key(name) {
            return Err(SolverError::DuplicateName(name.to_string()));
        }
        self.materials.insert(name.to_string(), material);
        Ok(())
    }

    pub fn add_section(&mut self, name: &str, section: Section) -> SolverResult<()> {
        if self.sections.contains_key(name) {
            return Err(SolverError::DuplicateName(name.to_string()));
        }
        self.sections.insert(name.to_string(), section);
        Ok(())
    }

    pub fn add_member(&mut self, name: &str, member: Member) -> SolverResult<()> {
        if !self.nodes.contains_key(&member.i_node) {
            return Err(SolverError::NodeNotFound(member.i_node.clone()));
        }
        if !self.nodes.contains_key(&member.j_node) {
            return Err(SolverError::NodeNotFound(member.j_node.clone()));
        }
        if !self.materials.contains_key(&member.material) {
            return Err(SolverError::MaterialNotFound(member.material.clone()));
        }
        if !self.sections.contains_key(&member.section) {
            return Err(SolverError::SectionNotFound(member.section.clone()));
        }
        if self.members.contains_key(name) {
            return Err(SolverError::DuplicateName(name.to_string()));
        }
        self.members.insert(name.to_string(), member);
        self.member_order.push(name.to_string());
        self.analyzed = false;
        Ok(())
    }

    /// Set (replace) the end releases of an existing member.
    pub fn def_releases(&mut self, member: &str, releases: Releases) -> SolverResult<()> {
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| SolverError::MemberNotFound(member.to_string()))?;
        m.releases = releases;
        self.analyzed = false;
        Ok(())
    }

    /// Set (replace) the support condition at a node.
    pub fn def_support(&mut self, node: &str, support: Support) -> SolverResult<()> {
        if !self.nodes.contains_key(node) {
            return Err(SolverError::NodeNotFound(node.to_string()));
        }
        self.supports.insert(node.to_string(), support);
        self.analyzed = false;
        Ok(())
    }

    /// Attach a weak elastic ground spring of the given stiffness to all six
    /// DOFs of a node.
    pub fn def_support_spring(&mut self, node: &str, stiffness: f64) -> SolverResult<()> {
        if !self.nodes.contains_key(node) {
            return Err(SolverError::NodeNotFound(node.to_string()));
        }
        self.springs.insert(node.to_string(), stiffness);
        self.analyzed = false;
        Ok(())
    }

    /// Ground-spring stiffness at a node, if one is attached.
    pub fn ground_spring(&self, node: &str) -> Option<f64> {
        self.springs.get(node).copied()
    }

    pub fn add_node_load(&mut self, node: &str, load: NodeLoad) -> SolverResult<()> {
        if !self.nodes.contains_key(node) {
            return Err(SolverError::NodeNotFound(node.to_string()));
        }
        self.node_loads
            .entry(node.to_string())
            .or_default()
            .push(load);
        self.analyzed = false;
        Ok(())
    }

    pub fn add_member_dist_load(&mut self, member: &str, load: DistributedLoad) -> SolverResult<()> {
        if !self.members.contains_key(member) {
            return Err(SolverError::MemberNotFound(member.to_string()));
        }
        self.dist_loads
            .entry(member.to_string())
            .or_default()
            .push(load);
        self.analyzed = false;
        Ok(())
    }

    /// Register self-weight for every member as a uniform line load
    /// `rho * A * factor` along a global axis, under the given case.
    pub fn add_member_self_weight(
        &mut self,
        direction: LoadDirection,
        factor: f64,
        case: &str,
    ) -> SolverResult<()> {
        if direction.is_local() {
            return Err(SolverError::Other(
                "self-weight direction must be a global axis".to_string(),
            ));
        }
        if self.members.is_empty() {
            return Err(SolverError::Other(
                "self-weight requires at least one member".to_string(),
            ));
        }
        for name in self.member_order.clone() {
            let member = &self.members[&name];
            let material = self
                .materials
                .get(&member.material)
                .ok_or_else(|| SolverError::MaterialNotFound(member.material.clone()))?;
            let section = self
                .sections
                .get(&member.section)
                .ok_or_else(|| SolverError::SectionNotFound(member.section.clone()))?;
            let w = material.rho * section.a * factor;
            self.add_member_dist_load(&name, DistributedLoad::new(w, direction, case))?;
        }
        Ok(())
    }

    pub fn add_load_combo(&mut self, combo: LoadCombination) -> SolverResult<()> {
        let name = combo.name.clone();
        if self.combos.contains_key(&name) {
            return Err(SolverError::DuplicateName(name));
        }
        self.combos.insert(name.clone(), combo);
        self.combo_order.push(name);
        self.analyzed = false;
        Ok(())
    }

    pub fn combo_names(&self) -> &[String] {
        &self.combo_order
    }

    // ========================
    // Analysis
    // ========================

    /// Run linear static analysis for every registered combination.
    pub fn analyze(&mut self, options: AnalysisOptions) -> SolverResult<()> {
        if self.combos.is_empty() {
            self.add_load_combo(LoadCombination::single("Combo 1", "Case 1"))?;
        }

        self.prepare()?;

        let dof_map = self.dof_map();
        let k_global = self.assemble_stiffness(&dof_map);

        // Partition into free and restrained DOFs, keeping labels for
        // instability diagnostics.
        let mut free: Vec<usize> = Vec::new();
        let mut free_labels: Vec<(String, &'static str)> = Vec::new();
        for name in &self.node_order {
            let base = dof_map[name];
            let restraints = self
                .supports
                .get(name)
                .map(|s| s.restraints())
                .unwrap_or([false; 6]);
            for (i, &restrained) in restraints.iter().enumerate() {
                if !restrained {
                    free.push(base + i);
                    free_labels.push((name.clone(), DOF_NAMES[i]));
                }
            }
        }
        // A fully restrained model is trivially solved by zero
        // displacement; skip the factorization entirely.
        let n_free = free.len();
        let lu = if free.is_empty() {
            None
        } else {
            let mut k11 = Mat::zeros(n_free, n_free);
            for (i, &di) in free.iter().enumerate() {
                for (j, &dj) in free.iter().enumerate() {
                    k11[(i, j)] = k_global[(di, dj)];
                }
            }

            // A free DOF with no stiffness is a mechanism.
            for (i, (node, dof)) in free_labels.iter().enumerate() {
                if k11[(i, i)].abs() < STABILITY_DIAG_TOLERANCE {
                    if options.check_stability {
                        return Err(SolverError::Unstable {
                            node: node.clone(),
                            dof: *dof,
                        });
                    }
                    log::warn!("no stiffness at node '{}' DOF {}, continuing", node, dof);
                }
            }

            Some(CheckedLu::factorize(&k11).ok_or(SolverError::Singular)?)
        };

        let n_dofs = self.node_order.len() * 6;
        for combo_name in self.combo_order.clone() {
            let combo = self.combos[&combo_name].clone();
            let p_global = self.build_load_vector(&combo, &dof_map);

            let mut d_full = DVec::zeros(n_dofs);
            if let Some(lu) = &lu {
                let mut p1 = DVec::zeros(n_free);
                for (i, &di) in free.iter().enumerate() {
                    p1[i] = p_global[di];
                }

                let d1 = lu.solve(&p1).ok_or(SolverError::Singular)?;
                for (i, &di) in free.iter().enumerate() {
                    d_full[di] = d1[i];
                }
            }

            for name in &self.node_order {
                let base = dof_map[name];
                let disp = [
                    d_full[base],
                    d_full[base + 1],
                    d_full[base + 2],
                    d_full[base + 3],
                    d_full[base + 4],
                    d_full[base + 5],
                ];
                let node = self.nodes.get_mut(name).expect("registered node");
                node.displacements.insert(combo_name.clone(), disp);
            }

            self.store_member_results(&combo_name, &combo)?;
        }

        self.analyzed = true;
        Ok(())
    }

    /// Compute and cache member lengths.
    fn prepare(&mut self) -> SolverResult<()> {
        for name in &self.member_order {
            let member = &self.members[name];
            let i_node = &self.nodes[&member.i_node];
            let j_node = &self.nodes[&member.j_node];
            let length = i_node.distance_to(j_node);
            if length < 1e-10 {
                return Err(SolverError::ZeroLengthMember(name.clone()));
            }
            self.members.get_mut(name).expect("registered member").length = Some(length);
        }
        Ok(())
    }

    fn dof_map(&self) -> HashMap<String, usize> {
        self.node_order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i * 6))
            .collect()
    }

    fn assemble_stiffness(&self, dof_map: &HashMap<String, usize>) -> Mat {
        let n_dofs = self.node_order.len() * 6;
        let mut k_global = Mat::zeros(n_dofs, n_dofs);

        for name in &self.member_order {
            let member = &self.members[name];
            let i_node = &self.nodes[&member.i_node];
            let j_node = &self.nodes[&member.j_node];
            let material = &self.materials[&member.material];
            let section = &self.sections[&member.section];
            let length = member.length.expect("length set in prepare");

            let k_local = math::member_local_stiffness(
                material.e, material.g, section.a, section.iy, section.iz, section.j, length,
            );
            let k_local = math::condense_releases(&k_local, &member.releases.as_array());
            let t = math::member_transformation(&i_node.coords(), &j_node.coords());
            let k_member = t.transpose() * k_local * t;

            let i_dof = dof_map[&member.i_node];
            let j_dof = dof_map[&member.j_node];
            for a in 0..6 {
                for b in 0..6 {
                    k_global[(i_dof + a, i_dof + b)] += k_member[(a, b)];
                    k_global[(i_dof + a, j_dof + b)] += k_member[(a, b + 6)];
                    k_global[(j_dof + a, i_dof + b)] += k_member[(a + 6, b)];
                    k_global[(j_dof + a, j_dof + b)] += k_member[(a + 6, b + 6)];
                }
            }
        }

        for name in &self.node_order {
            if let Some(&stiffness) = self.springs.get(name) {
                let base = dof_map[name];
                for d in 0..6 {
                    k_global[(base + d, base + d)] += stiffness;
                }
            }
        }

        k_global
    }

    fn build_load_vector(&self, combo: &LoadCombination, dof_map: &HashMap<String, usize>) -> DVec {
        let n_dofs = self.node_order.len() * 6;
        let mut p = DVec::zeros(n_dofs);

        for name in &self.node_order {
            if let Some(loads) = self.node_loads.get(name) {
                let base = dof_map[name];
                for load in loads {
                    let factor = combo.factor(&load.case);
                    if factor.abs() < FACTOR_TOLERANCE {
                        continue;
                    }
                    let arr = load.as_array();
                    for i in 0..6 {
                        p[base + i] += factor * arr[i];
                    }
                }
            }
        }

        // Equivalent nodal forces from member span loads: P -= T^T * FER,
        // with the FER condensed for end releases.
        for name in &self.member_order {
            let member = &self.members[name];
            let i_node = &self.nodes[&member.i_node];
            let j_node = &self.nodes[&member.j_node];
            let length = member.length.expect("length set in prepare");

            let t = math::member_transformation(&i_node.coords(), &j_node.coords());
            let r = math::rotation_block(&t);
            let w_local = self.factored_span_load(name, combo, &r);
            if w_local.iter().all(|w| w.abs() < FACTOR_TOLERANCE) {
                continue;
            }

            let mut fer = Vec12::zeros();
            for (axis, &w) in w_local.iter().enumerate() {
                if w.abs() >= FACTOR_TOLERANCE {
                    fer += math::fer_uniform_load(w, length, axis);
                }
            }

            let material = &self.materials[&member.material];
            let section = &self.sections[&member.section];
            let k_local = math::member_local_stiffness(
                material.e, material.g, section.a, section.iy, section.iz, section.j, length,
            );
            let fer = math::condense_fer(&fer, &k_local, &member.releases.as_array());
            let fer_global = t.transpose() * fer;

            let i_dof = dof_map[&member.i_node];
            let j_dof = dof_map[&member.j_node];
            for i in 0..6 {
                p[i_dof + i] -= fer_global[i];
                p[j_dof + i] -= fer_global[i + 6];
            }
        }

        p
    }

    /// Factored uniform span load on a member in local axes [wx, wy, wz]
    /// under a combination. `r`'s rows are the member's local axes in global
    /// coordinates.
    fn factored_span_load(&self, member: &str, combo: &LoadCombination, r: &Mat3) -> [f64; 3] {
        let mut w_local = [0.0; 3];
        if let Some(loads) = self.dist_loads.get(member) {
            for load in loads {
                let factor = combo.factor(&load.case);
                if factor.abs() < FACTOR_TOLERANCE {
                    continue;
                }
                let w = factor * load.w;
                if let Some(axis) = load.direction.local_axis() {
                    w_local[axis] += w;
                } else if let Some(unit) = load.direction.global_vector() {
                    for axis in 0..3 {
                        w_local[axis] +=
                            w * (r[(axis, 0)] * unit[0] + r[(axis, 1)] * unit[1] + r[(axis, 2)] * unit[2]);
                    }
                }
            }
        }
        w_local
    }

    /// Compute and store local end forces, local end displacements and the
    /// factored span load for every member under one combination.
    fn store_member_results(&mut self, combo_name: &str, combo: &LoadCombination) -> SolverResult<()> {
        for name in self.member_order.clone() {
            let member = &self.members[&name];
            let i_node = &self.nodes[&member.i_node];
            let j_node = &self.nodes[&member.j_node];
            let material = &self.materials[&member.material];
            let section = &self.sections[&member.section];
            let length = member.length.expect("length set in prepare");

            let d_i = i_node
                .displacements
                .get(combo_name)
                .ok_or_else(|| SolverError::NotAnalyzed(combo_name.to_string()))?;
            let d_j = j_node
                .displacements
                .get(combo_name)
                .ok_or_else(|| SolverError::NotAnalyzed(combo_name.to_string()))?;
            let d_global = Vec12::from_iterator(d_i.iter().chain(d_j.iter()).copied());

            let t = math::member_transformation(&i_node.coords(), &j_node.coords());
            let r = math::rotation_block(&t);
            let d_local = t * d_global;

            let k_local = math::member_local_stiffness(
                material.e, material.g, section.a, section.iy, section.iz, section.j, length,
            );
            let releases = member.releases.as_array();
            let k_released = math::condense_releases(&k_local, &releases);

            let w_local = self.factored_span_load(&name, combo, &r);
            let mut fer = Vec12::zeros();
            for (axis, &w) in w_local.iter().enumerate() {
                if w.abs() >= FACTOR_TOLERANCE {
                    fer += math::fer_uniform_load(w, length, axis);
                }
            }

            // F = K * d + FER: elastic forces plus the fixed-end
            // contribution of loads applied between the nodes.
            let mut f_local = k_released * d_local;
            if releases.iter().any(|&rel| rel) || fer.iter().any(|v| v.abs() >= FACTOR_TOLERANCE) {
                f_local += math::condense_fer(&fer, &k_local, &releases);
            }

            // Released ends rotate independently of their nodes; recover
            // their displacements so the deflected shape interpolates the
            // member-end values, not the nodal ones.
            let d_member = math::expand_released_displacements(&d_local, &fer, &k_local, &releases);

            let mut forces = [0.0; 12];
            let mut displacements = [0.0; 12];
            for i in 0..12 {
                forces[i] = f_local[i];
                displacements[i] = d_member[i];
            }

            let member = self.members.get_mut(&name).expect("registered member");
            member.local_forces.insert(combo_name.to_string(), forces);
            member
                .local_displacements
                .insert(combo_name.to_string(), displacements);
            member
                .local_span_load
                .insert(combo_name.to_string(), w_local);
        }
        Ok(())
    }

    // ========================
    // Result access
    // ========================

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// Nodal displacement [DX, DY, DZ, RX, RY, RZ] under a combination.
    pub fn node_displacement(&self, node: &str, combo: &str) -> SolverResult<[f64; 6]> {
        let n = self
            .nodes
            .get(node)
            .ok_or_else(|| SolverError::NodeNotFound(node.to_string()))?;
        n.displacement(combo)
            .ok_or_else(|| SolverError::NotAnalyzed(combo.to_string()))
    }

    /// Local member end forces [Fx_i..Mz_i, Fx_j..Mz_j] under a combination.
    pub fn member_end_forces(&self, member: &str, combo: &str) -> SolverResult<[f64; 12]> {
        let m = self
            .members
            .get(member)
            .ok_or_else(|| SolverError::MemberNotFound(member.to_string()))?;
        m.local_force(combo)
            .ok_or_else(|| SolverError::NotAnalyzed(combo.to_string()))
    }

    pub fn member_length(&self, member: &str) -> SolverResult<f64> {
        let m = self
            .members
            .get(member)
            .ok_or_else(|| SolverError::MemberNotFound(member.to_string()))?;
        m.length
            .ok_or_else(|| SolverError::Other(format!("member '{}' not prepared", member)))
    }

    fn member_state(&self, member: &str, combo: &str) -> SolverResult<(&Member, [f64; 12], [f64; 3], f64)> {
        let m = self
            .members
            .get(member)
            .ok_or_else(|| SolverError::MemberNotFound(member.to_string()))?;
        let forces = m
            .local_forces
            .get(combo)
            .copied()
            .ok_or_else(|| SolverError::NotAnalyzed(combo.to_string()))?;
        let w = m.local_span_load.get(combo).copied().unwrap_or([0.0; 3]);
        let length = m
            .length
            .ok_or_else(|| SolverError::Other(format!("member '{}' not prepared", member)))?;
        Ok((m, forces, w, length))
    }

    /// Axial force at position `x` from the i-end (tension positive).
    pub fn member_axial(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, w, _) = self.member_state(member, combo)?;
        Ok(-(f[0] + w[0] * x))
    }

    /// Shear force in the local y direction at position `x`.
    pub fn member_shear_y(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, w, _) = self.member_state(member, combo)?;
        Ok(f[1] + w[1] * x)
    }

    /// Shear force in the local z direction at position `x`.
    pub fn member_shear_z(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, w, _) = self.member_state(member, combo)?;
        Ok(f[2] + w[2] * x)
    }

    /// Torque about the member axis (constant along the span).
    pub fn member_torque(&self, member: &str, _x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, _, _) = self.member_state(member, combo)?;
        Ok(-f[3])
    }

    /// Bending moment about the local y axis at position `x`.
    pub fn member_moment_y(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, w, _) = self.member_state(member, combo)?;
        Ok(f[4] + f[2] * x + w[2] * x * x / 2.0)
    }

    /// Bending moment about the local z axis at position `x`.
    pub fn member_moment_z(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (_, f, w, _) = self.member_state(member, combo)?;
        Ok(f[5] - f[1] * x - w[1] * x * x / 2.0)
    }

    /// Local y (vertical) deflection at position `x`: Hermite interpolation
    /// of the end displacements plus the clamped-clamped particular solution
    /// for the uniform span load.
    pub fn member_deflection_y(&self, member: &str, x: f64, combo: &str) -> SolverResult<f64> {
        let (m, _, w, l) = self.member_state(member, combo)?;
        let d = m
            .local_displacements
            .get(combo)
            .ok_or_else(|| SolverError::NotAnalyzed(combo.to_string()))?;
        let material = &self.materials[&m.material];
        let section = &self.sections[&m.section];

        let xi = x / l;
        let xi2 = xi * xi;
        let xi3 = xi2 * xi;
        let h1 = 1.0 - 3.0 * xi2 + 2.0 * xi3;
        let h2 = l * (xi - 2.0 * xi2 + xi3);
        let h3 = 3.0 * xi2 - 2.0 * xi3;
        let h4 = l * (xi3 - xi2);
        let homogeneous = h1 * d[1] + h2 * d[5] + h3 * d[7] + h4 * d[11];

        let particular = w[1] * x * x * (l - x) * (l - x) / (24.0 * material.e * section.iz);
        Ok(homogeneous + particular)
    }

    /// Minimum and maximum local y deflection over the member's length.
    pub fn member_deflection_y_extremes(&self, member: &str, combo: &str) -> SolverResult<(f64, f64)> {
        let length = self.member_length(member)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..DEFLECTION_SCAN_STATIONS {
            let x = length * i as f64 / (DEFLECTION_SCAN_STATIONS - 1) as f64;
            let v = self.member_deflection_y(member, x, combo)?;
            min = min.min(v);
            max = max.max(v);
        }
        Ok((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const E: f64 = 2.0e8; // kN/m^2
    const G: f64 = 8.0e7;

    fn cantilever(length: f64) -> FrameModel {
        let mut model = FrameModel::new();
        model.add_node("N1", 0.0, 0.0, 0.0).unwrap();
        model.add_node("N2", length, 0.0, 0.0).unwrap();
        model
            .add_material("steel", Material::new(E, G, 0.3, 76.8))
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
    fn cantilever_tip_point_load() {
        let mut model = cantilever(2.0);
        model
            .add_node_load("N2", NodeLoad::fy(-10.0, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        // Tip deflection P*L^3 / (3*E*Iz).
        let disp = model.node_displacement("N2", "Combo 1").unwrap();
        let expected = -10.0 * 8.0 / (3.0 * E * 1.0e-5);
        assert_relative_eq!(disp[1], expected, max_relative = 1e-9);

        // Fixed-end moment P*L, decaying to zero at the free end.
        let m0 = model.member_moment_z("M1", 0.0, "Combo 1").unwrap();
        assert_relative_eq!(m0.abs(), 20.0, max_relative = 1e-9);
        let m_tip = model.member_moment_z("M1", 2.0, "Combo 1").unwrap();
        assert_relative_eq!(m_tip, 0.0, epsilon = 1e-8);

        // Shear is constant and equal to the tip load.
        let v = model.member_shear_y("M1", 1.0, "Combo 1").unwrap();
        assert_relative_eq!(v.abs(), 10.0, max_relative = 1e-9);
    }

    #[test]
    fn cantilever_uniform_load_matches_beam_theory() {
        let mut model = cantilever(3.0);
        model
            .add_member_dist_load("M1", DistributedLoad::new(-10.0, LoadDirection::FY, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        // Fixed-end moment w*L^2/2 = 45.
        let m0 = model.member_moment_z("M1", 0.0, "Combo 1").unwrap();
        assert_relative_eq!(m0.abs(), 45.0, max_relative = 1e-9);

        // Tip deflection w*L^4 / (8*E*Iz).
        let (min, max) = model.member_deflection_y_extremes("M1", "Combo 1").unwrap();
        let expected = -10.0 * 81.0 / (8.0 * E * 1.0e-5);
        assert_relative_eq!(min, expected, max_relative = 1e-9);
        assert_relative_eq!(max, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn unsupported_model_fails_as_ill_posed() {
        let mut model = cantilever(2.0);
        model.supports.clear();
        model
            .add_node_load("N2", NodeLoad::fy(-10.0, "Case 1"))
            .unwrap();
        let err = model.analyze(AnalysisOptions::strict()).unwrap_err();
        assert!(err.is_ill_posed(), "expected ill-posed, got {err}");
    }

    #[test]
    fn ground_springs_rescue_unsupported_model() {
        let mut model = cantilever(2.0);
        model.supports.clear();
        model.def_support_spring("N1", 1e-2).unwrap();
        model.def_support_spring("N2", 1e-2).unwrap();
        model
            .add_node_load("N2", NodeLoad::fy(-10.0, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::relaxed()).unwrap();

        let disp = model.node_displacement("N2", "Combo 1").unwrap();
        assert!(disp.iter().all(|v| v.is_finite()));
        assert!(disp[1] < 0.0);
    }

    #[test]
    fn fully_fixed_model_solves_without_free_dofs() {
        let mut model = cantilever(4.0);
        model.def_support("N2", Support::fixed()).unwrap();
        model
            .add_member_dist_load("M1", DistributedLoad::new(-10.0, LoadDirection::FY, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        let disp = model.node_displacement("N2", "Combo 1").unwrap();
        assert_eq!(disp, [0.0; 6]);

        // End forces reduce to the fixed-end reactions.
        let f = model.member_end_forces("M1", "Combo 1").unwrap();
        assert_relative_eq!(f[1].abs(), 20.0, max_relative = 1e-9);
        assert_relative_eq!(f[5].abs(), 10.0 * 16.0 / 12.0, max_relative = 1e-9);
    }

    #[test]
    fn zero_length_member_is_rejected() {
        let mut model = FrameModel::new();
        model.add_node("N1", 0.0, 0.0, 0.0).unwrap();
        model.add_node("N2", 0.0, 0.0, 0.0).unwrap();
        model
            .add_material("steel", Material::new(E, G, 0.3, 76.8))
            .unwrap();
        model
            .add_section("sec", Section::new(0.01, 1.0e-5, 1.0e-5, 2.0e-5))
            .unwrap();
        model
            .add_member("M1", Member::new("N1", "N2", "steel", "sec"))
            .unwrap();
        model.def_support("N1", Support::fixed()).unwrap();
        let err = model.analyze(AnalysisOptions::strict()).unwrap_err();
        assert!(matches!(err, SolverError::ZeroLengthMember(_)));
    }

    #[test]
    fn released_member_leaves_support_rotations_free() {
        // A pin-ended (fully released) member gives its end nodes no
        // rotational stiffness; the strict stability check must object.
        let mut model = cantilever(2.0);
        model
            .def_releases("M1", Releases::all_rotational())
            .unwrap();
        model.def_support("N1", Support::pinned()).unwrap();
        model.def_support("N2", Support::pinned()).unwrap();
        let err = model.analyze(AnalysisOptions::strict()).unwrap_err();
        assert!(matches!(err, SolverError::Unstable { .. }));
    }

    #[test]
    fn released_member_deflects_as_simply_supported() {
        // Bending releases at both ends decouple the member from the
        // nodal rotations; the deflected shape must come from the
        // recovered end slopes, not the (zero) nodal values.
        let mut model = cantilever(6.0);
        model.def_support("N2", Support::fixed()).unwrap();
        model
            .def_releases("M1", Releases::rotational(false, true, true, false, true, true))
            .unwrap();
        model
            .add_member_dist_load("M1", DistributedLoad::new(-10.0, LoadDirection::Fy, "Case 1"))
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        // Midspan sag 5*w*L^4 / (384*E*Iz), the simply supported value.
        let (min, max) = model
            .member_deflection_y_extremes("M1", "Combo 1")
            .unwrap();
        let expected = 5.0 * -10.0 * 6.0f64.powi(4) / (384.0 * E * 1.0e-5);
        assert_relative_eq!(min, expected, max_relative = 1e-9);
        assert_relative_eq!(max, 0.0, epsilon = 1e-9);

        // Midspan moment still matches wL^2/8 for the released span.
        let m_mid = model.member_moment_z("M1", 3.0, "Combo 1").unwrap();
        assert_relative_eq!(m_mid.abs(), 10.0 * 36.0 / 8.0, max_relative = 1e-9);
    }

    #[test]
    fn self_weight_loads_every_member() {
        let mut model = cantilever(3.0);
        model
            .add_member_self_weight(LoadDirection::FY, -1.0, "Case 1")
            .unwrap();
        model.analyze(AnalysisOptions::strict()).unwrap();

        // w = rho * A = 76.8 * 0.01 = 0.768 kN/m downward.
        let v0 = model.member_shear_y("M1", 0.0, "Combo 1").unwrap();
        assert_relative_eq!(v0.abs(), 0.768 * 3.0, max_relative = 1e-9);

        let err = model
            .add_member_self_weight(LoadDirection::Fy, -1.0, "Case 1")
            .unwrap_err();
        assert!(matches!(err, SolverError::Other(_)));
    }
}
