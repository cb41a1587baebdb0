//! A point in 3D space, immutable after registration within a request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A 3D node in the frame model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Displacement results [DX, DY, DZ, RX, RY, RZ] by combination.
    #[serde(skip)]
    pub(crate) displacements: HashMap<String, [f64; 6]>,
}

impl Node {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            displacements: HashMap::new(),
        }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Displacement [DX, DY, DZ, RX, RY, RZ] under a combination, if solved.
    pub fn displacement(&self, combo: &str) -> Option<[f64; 6]> {
        self.displacements.get(combo).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        let a = Node::new(0.0, 0.0, 0.0);
        let b = Node::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }
}
