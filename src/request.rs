//! Wire-format request types and validation.
//!
//! The JSON schema mirrors what the front end sends: flat lists of nodes,
//! members, supports, load cases and combinations, all referring to each
//! other by id. [`AnalyzeRequest::validate`] checks referential integrity
//! up front so the solver only ever sees a well-formed model.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Coordinates closer than this are treated as coincident.
const COINCIDENT_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Structural behavior of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Full frame element: axial, bending, torsion and shear.
    Frame,
    /// Axial-only element; all rotational end releases are forced on.
    Truss,
}

impl Default for MemberKind {
    fn default() -> Self {
        MemberKind::Frame
    }
}

/// End-release flags as sent on the wire. `true` releases the rotation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReleaseSpec {
    #[serde(rename = "Rxi", default)]
    pub rxi: bool,
    #[serde(rename = "Ryi", default)]
    pub ryi: bool,
    #[serde(rename = "Rzi", default)]
    pub rzi: bool,
    #[serde(rename = "Rxj", default)]
    pub rxj: bool,
    #[serde(rename = "Ryj", default)]
    pub ryj: bool,
    #[serde(rename = "Rzj", default)]
    pub rzj: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSpec {
    pub id: String,
    /// Start node id.
    pub i: String,
    /// End node id.
    pub j: String,
    #[serde(rename = "type", default)]
    pub kind: MemberKind,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "Iy")]
    pub iy: f64,
    #[serde(rename = "Iz")]
    pub iz: f64,
    #[serde(rename = "J")]
    pub jx: f64,
    #[serde(default)]
    pub releases: Option<ReleaseSpec>,
}

/// Restrained DOFs at a supported node. `true` means fixed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FixSpec {
    #[serde(rename = "DX", default)]
    pub dx: bool,
    #[serde(rename = "DY", default)]
    pub dy: bool,
    #[serde(rename = "DZ", default)]
    pub dz: bool,
    #[serde(rename = "RX", default)]
    pub rx: bool,
    #[serde(rename = "RY", default)]
    pub ry: bool,
    #[serde(rename = "RZ", default)]
    pub rz: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportSpec {
    #[serde(rename = "nodeId")]
    pub node_id: String,
    pub fix: FixSpec,
}

/// A uniform line load on a member along a global axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUdlSpec {
    #[serde(rename = "memberId")]
    pub member_id: String,
    /// Global direction: "GX", "GY" or "GZ".
    pub dir: UdlDirection,
    /// Signed magnitude per unit length.
    pub w: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UdlDirection {
    #[serde(rename = "GX")]
    Gx,
    #[serde(rename = "GY")]
    Gy,
    #[serde(rename = "GZ")]
    Gz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCaseSpec {
    pub name: String,
    /// Self-weight multiplier applied along global Y (negative is down).
    /// Omitted or zero means no self-weight in this case.
    #[serde(rename = "selfweightY", default)]
    pub selfweight_y: f64,
    #[serde(rename = "memberUDL", default)]
    pub member_udl: Vec<MemberUdlSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboSpec {
    pub name: String,
    /// Case name -> scale factor.
    pub factors: HashMap<String, f64>,
}

/// Declared units of the request. Informational; the solver is unit-agnostic
/// as long as the inputs are consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsSpec {
    #[serde(default = "default_length_unit")]
    pub length: String,
    #[serde(default = "default_force_unit")]
    pub force: String,
}

fn default_length_unit() -> String {
    "m".to_string()
}

fn default_force_unit() -> String {
    "kN".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub nodes: Vec<NodeSpec>,
    pub members: Vec<MemberSpec>,
    #[serde(default)]
    pub supports: Vec<SupportSpec>,
    #[serde(default)]
    pub cases: Vec<LoadCaseSpec>,
    #[serde(default)]
    pub combos: Vec<ComboSpec>,
    #[serde(default)]
    pub units: Option<UnitsSpec>,
}

impl AnalyzeRequest {
    /// Fill in the implicit defaults: no cases means a single self-weight
    /// case, no combos means the first case at factor 1.0.
    pub fn with_defaults(mut self) -> Self {
        if self.cases.is_empty() {
            self.cases.push(LoadCaseSpec {
                name: "Case 1".to_string(),
                selfweight_y: -1.0,
                member_udl: Vec::new(),
            });
        }
        if self.combos.is_empty() {
            let first = self.cases[0].name.clone();
            self.combos.push(ComboSpec {
                name: "Combo 1".to_string(),
                factors: HashMap::from([(first, 1.0)]),
            });
        }
        self
    }

    /// The combination reported in the response. The first declared
    /// combination governs.
    pub fn governing_combo(&self) -> Option<&str> {
        self.combos.first().map(|c| c.name.as_str())
    }

    /// Check referential integrity and geometric sanity. Call after
    /// [`with_defaults`].
    pub fn validate(&self) -> Result<(), RequestError> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(RequestError::DuplicateNode(node.id.clone()));
            }
        }

        let coords: HashMap<&str, [f64; 3]> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), [n.x, n.y, n.z]))
            .collect();

        let mut member_ids = HashSet::new();
        for member in &self.members {
            if !member_ids.insert(member.id.as_str()) {
                return Err(RequestError::DuplicateMember(member.id.clone()));
            }
            for end in [&member.i, &member.j] {
                if !node_ids.contains(end.as_str()) {
                    return Err(RequestError::UnknownMemberNode {
                        member: member.id.clone(),
                        node: end.clone(),
                    });
                }
            }
            let a = coords[member.i.as_str()];
            let b = coords[member.j.as_str()];
            let length = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2))
                .sqrt();
            if length < COINCIDENT_TOLERANCE {
                return Err(RequestError::DegenerateMember(member.id.clone()));
            }
        }

        for support in &self.supports {
            if !node_ids.contains(support.node_id.as_str()) {
                return Err(RequestError::UnknownSupportNode(support.node_id.clone()));
            }
        }

        for case in &self.cases {
            for udl in &case.member_udl {
                if !member_ids.contains(udl.member_id.as_str()) {
                    return Err(RequestError::UnknownLoadMember {
                        case: case.name.clone(),
                        member: udl.member_id.clone(),
                    });
                }
            }
        }

        let case_names: HashSet<&str> = self.cases.iter().map(|c| c.name.as_str()).collect();
        for combo in &self.combos {
            for case in combo.factors.keys() {
                if !case_names.contains(case.as_str()) {
                    return Err(RequestError::UnknownComboCase {
                        combo: combo.name.clone(),
                        case: case.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
