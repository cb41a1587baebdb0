//! Nodal support conditions.

use serde::{Deserialize, Serialize};

/// Support fixity at a node: per-DOF booleans, true = displacement held at
/// zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Support {
    pub dx: bool,
    pub dy: bool,
    pub dz: bool,
    pub rx: bool,
    pub ry: bool,
    pub rz: bool,
}

impl Support {
    pub fn new(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// All six DOFs restrained.
    pub fn fixed() -> Self {
        Self::new(true, true, true, true, true, true)
    }

    /// Translations restrained, rotations free.
    pub fn pinned() -> Self {
        Self::new(true, true, true, false, false, false)
    }

    /// Restraint flags in DOF order [DX, DY, DZ, RX, RY, RZ].
    pub fn restraints(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Force the three rotational fixities on, leaving translations as-is.
    /// Used by the escalation controller's forced-fixed-rotation profile.
    pub fn with_fixed_rotations(mut self) -> Self {
        self.rx = true;
        self.ry = true;
        self.rz = true;
        self
    }

    pub fn is_supported(&self) -> bool {
        self.restraints().iter().any(|&r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_rotations_leave_translations_alone() {
        let s = Support::new(true, true, false, false, false, false).with_fixed_rotations();
        assert!(s.dx && s.dy && !s.dz);
        assert!(s.rx && s.ry && s.rz);
    }

    #[test]
    fn pinned_restrains_translations_only() {
        let s = Support::pinned();
        assert_eq!(s.restraints(), [true, true, true, false, false, false]);
    }
}
