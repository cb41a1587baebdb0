//! Frame/truss member element.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// End releases for a member. Index order per end: [DX, DY, DZ, RX, RY, RZ].
/// Only rotational releases are modeled; the translational slots exist to
/// line up with the 12-DOF member vector and stay false.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Releases {
    pub i_end: [bool; 6],
    pub j_end: [bool; 6],
}

impl Releases {
    /// No releases: fully continuous connections at both ends.
    pub fn none() -> Self {
        Self::default()
    }

    /// The axial-only truss idealization: bending released at both ends,
    /// torsion released at the j end. One torsion release already zeroes the
    /// torsional stiffness.
    pub fn all_rotational() -> Self {
        Self::rotational(false, true, true, true, true, true)
    }

    /// Build from the six rotational flags (Rxi, Ryi, Rzi, Rxj, Ryj, Rzj).
    /// Releasing torsion at both ends would leave the torsion pair with a
    /// rigid mode that static condensation cannot remove, so the i end stays
    /// attached in that case.
    pub fn rotational(rxi: bool, ryi: bool, rzi: bool, rxj: bool, ryj: bool, rzj: bool) -> Self {
        let rxi = rxi && !rxj;
        Self {
            i_end: [false, false, false, rxi, ryi, rzi],
            j_end: [false, false, false, rxj, ryj, rzj],
        }
    }

    /// Combined 12-element release mask (i-end then j-end).
    pub fn as_array(&self) -> [bool; 12] {
        let mut arr = [false; 12];
        arr[0..6].copy_from_slice(&self.i_end);
        arr[6..12].copy_from_slice(&self.j_end);
        arr
    }

    pub fn any(&self) -> bool {
        self.i_end.iter().chain(self.j_end.iter()).any(|&r| r)
    }
}

/// A 3D frame member referencing its end nodes and property handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub i_node: String,
    pub j_node: String,
    pub material: String,
    pub section: String,
    pub releases: Releases,

    /// Length computed during analysis preparation.
    #[serde(skip)]
    pub(crate) length: Option<f64>,

    /// Local end forces [Fx_i..Mz_i, Fx_j..Mz_j] by combination, including
    /// fixed-end contributions from span loading.
    #[serde(skip)]
    pub(crate) local_forces: HashMap<String, [f64; 12]>,

    /// Local end displacements by combination.
    #[serde(skip)]
    pub(crate) local_displacements: HashMap<String, [f64; 12]>,

    /// Factored uniform span load in local axes [wx, wy, wz] by combination.
    #[serde(skip)]
    pub(crate) local_span_load: HashMap<String, [f64; 3]>,
}

impl Member {
    pub fn new(i_node: &str, j_node: &str, material: &str, section: &str) -> Self {
        Self {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            material: material.to_string(),
            section: section.to_string(),
            releases: Releases::none(),
            length: None,
            local_forces: HashMap::new(),
            local_displacements: HashMap::new(),
            local_span_load: HashMap::new(),
        }
    }

    pub fn with_releases(mut self, releases: Releases) -> Self {
        self.releases = releases;
        self
    }

    /// Member length, available after analysis preparation.
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Local end forces for a combination, if solved.
    pub fn local_force(&self, combo: &str) -> Option<[f64; 12]> {
        self.local_forces.get(combo).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truss_release_mask_covers_bending_and_one_torsion_end() {
        let arr = Releases::all_rotational().as_array();
        for idx in [4, 5, 9, 10, 11] {
            assert!(arr[idx]);
        }
        for idx in [0, 1, 2, 3, 6, 7, 8] {
            assert!(!arr[idx]);
        }
    }

    #[test]
    fn rotational_flags_map_to_ends() {
        let r = Releases::rotational(true, false, false, false, false, true);
        assert!(r.i_end[3]);
        assert!(!r.i_end[4]);
        assert!(r.j_end[5]);
        assert!(r.any());
        assert!(!Releases::none().any());
    }

    #[test]
    fn double_torsion_release_keeps_i_end_attached() {
        let r = Releases::rotational(true, false, false, true, false, false);
        assert!(!r.i_end[3]);
        assert!(r.j_end[3]);
    }
}
