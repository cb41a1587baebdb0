//! Load types and load combinations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction token for a member load. Lowercase variants act along the
/// member's local axes, uppercase along the global axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Member local x (axial).
    Fx,
    /// Member local y.
    Fy,
    /// Member local z.
    Fz,
    /// Global X.
    FX,
    /// Global Y.
    FY,
    /// Global Z.
    FZ,
}

impl LoadDirection {
    pub fn is_local(self) -> bool {
        matches!(self, Self::Fx | Self::Fy | Self::Fz)
    }

    /// Local axis index (0..=2) for local directions.
    pub fn local_axis(self) -> Option<usize> {
        match self {
            Self::Fx => Some(0),
            Self::Fy => Some(1),
            Self::Fz => Some(2),
            _ => None,
        }
    }

    /// Global unit vector for global directions.
    pub fn global_vector(self) -> Option<[f64; 3]> {
        match self {
            Self::FX => Some([1.0, 0.0, 0.0]),
            Self::FY => Some([0.0, 1.0, 0.0]),
            Self::FZ => Some([0.0, 0.0, 1.0]),
            _ => None,
        }
    }
}

/// A uniform line load over a member's full length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Signed magnitude per unit length.
    pub w: f64,
    pub direction: LoadDirection,
    /// Load case this load belongs to.
    pub case: String,
}

impl DistributedLoad {
    pub fn new(w: f64, direction: LoadDirection, case: &str) -> Self {
        Self {
            w,
            direction,
            case: case.to_string(),
        }
    }
}

/// A concentrated force/moment applied directly to a node, in global axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLoad {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    pub case: String,
}

impl NodeLoad {
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64, case: &str) -> Self {
        Self {
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
            case: case.to_string(),
        }
    }

    /// Force-only load.
    pub fn force(fx: f64, fy: f64, fz: f64, case: &str) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0, case)
    }

    /// Vertical force.
    pub fn fy(value: f64, case: &str) -> Self {
        Self::force(0.0, value, 0.0, case)
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }
}

/// A named linear superposition of load cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCombination {
    pub name: String,
    /// Scale factor per load-case name.
    pub factors: HashMap<String, f64>,
}

impl LoadCombination {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            factors: HashMap::new(),
        }
    }

    /// A combination of a single case at factor 1.0.
    pub fn single(name: &str, case: &str) -> Self {
        Self::new(name).with_case(case, 1.0)
    }

    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        self.factors.insert(case.to_string(), factor);
        self
    }

    /// Factor for a case, 0.0 when the case is not part of the combination.
    pub fn factor(&self, case: &str) -> f64 {
        self.factors.get(case).copied().unwrap_or(0.0)
    }
}
