//! Material and cross-section properties.

use serde::{Deserialize, Serialize};

/// Linear-elastic material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Material {
    /// Young's modulus.
    pub e: f64,
    /// Shear modulus.
    pub g: f64,
    /// Poisson's ratio.
    pub nu: f64,
    /// Unit weight (weight per unit volume), used only for self-weight loads.
    pub rho: f64,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self { e, g, nu, rho }
    }
}

/// Frame member cross-section properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area.
    pub a: f64,
    /// Second moment of area about the local y axis.
    pub iy: f64,
    /// Second moment of area about the local z axis.
    pub iz: f64,
    /// Torsional constant.
    pub j: f64,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Solid rectangle, handy for tests and quick models.
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;
        let (long, short) = if width > depth {
            (width, depth)
        } else {
            (depth, width)
        };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);
        Self { a, iy, iz, j }
    }
}
