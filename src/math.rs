//! Matrix utilities for 3D frame analysis.

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector};

pub type Mat = DMatrix<f64>;
pub type DVec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;

/// 12x12 matrix for member stiffness.
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member end forces/displacements.
pub type Vec12 = SVector<f64, 12>;

/// Relative pivot threshold below which an LU factorization is treated as
/// numerically singular.
const PIVOT_RATIO_TOLERANCE: f64 = 1e-12;

/// Compute the 12x12 local-to-global transformation matrix for a 3D frame
/// member, following the PyNite axis convention:
/// - vertical members: local y in the XY plane, local z parallel to global Z
/// - horizontal members: local y = global Y, local z = x cross y
/// - inclined members: local z horizontal and perpendicular to the member
pub fn member_transformation(i_node: &[f64; 3], j_node: &[f64; 3]) -> Mat12 {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let dz = j_node[2] - i_node[2];
    let length = (dx * dx + dy * dy + dz * dz).sqrt();
    debug_assert!(length > 0.0, "zero-length member reached transformation");

    let x = [dx / length, dy / length, dz / length];

    let (y, z) = if x[0].abs() < 1e-10 && x[2].abs() < 1e-10 {
        // Vertical member: only a Y component.
        if x[1] > 0.0 {
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        } else {
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        }
    } else if dy.abs() < 1e-10 {
        // Horizontal member.
        let y = [0.0, 1.0, 0.0];
        let z = normalize(cross(x, y));
        (y, z)
    } else {
        // Inclined member: local z perpendicular to the member in the
        // horizontal plane, local y completes the right-handed triple.
        let proj = [dx, 0.0, dz];
        let z = if x[1] > 0.0 {
            normalize(cross(proj, x))
        } else {
            normalize(cross(x, proj))
        };
        let y = normalize(cross(z, x));
        (y, z)
    };

    let r = Mat3::new(
        x[0], x[1], x[2], //
        y[0], y[1], y[2], //
        z[0], z[1], z[2],
    );

    let mut t = Mat12::zeros();
    for block in 0..4 {
        let o = block * 3;
        for row in 0..3 {
            for col in 0..3 {
                t[(o + row, o + col)] = r[(row, col)];
            }
        }
    }
    t
}

/// Extract the 3x3 rotation block (rows are the local axes expressed in
/// global coordinates) from a 12x12 transformation matrix.
pub fn rotation_block(t: &Mat12) -> Mat3 {
    Mat3::new(
        t[(0, 0)], t[(0, 1)], t[(0, 2)], //
        t[(1, 0)], t[(1, 1)], t[(1, 2)], //
        t[(2, 0)], t[(2, 1)], t[(2, 2)],
    )
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / n, v[1] / n, v[2] / n]
}

/// 12x12 local elastic stiffness matrix for a 3D frame member.
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;
    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;
    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,   0.0,          0.0,          0.0,   0.0,         0.0,         -ea_l,  0.0,          0.0,          0.0,   0.0,         0.0,
        0.0,    12.0*eiz_l3,  0.0,          0.0,   0.0,         6.0*eiz_l2,  0.0,    -12.0*eiz_l3, 0.0,          0.0,   0.0,         6.0*eiz_l2,
        0.0,    0.0,          12.0*eiy_l3,  0.0,   -6.0*eiy_l2, 0.0,         0.0,    0.0,          -12.0*eiy_l3, 0.0,   -6.0*eiy_l2, 0.0,
        0.0,    0.0,          0.0,          gj_l,  0.0,         0.0,         0.0,    0.0,          0.0,          -gj_l, 0.0,         0.0,
        0.0,    0.0,          -6.0*eiy_l2,  0.0,   4.0*eiy_l,   0.0,         0.0,    0.0,          6.0*eiy_l2,   0.0,   2.0*eiy_l,   0.0,
        0.0,    6.0*eiz_l2,   0.0,          0.0,   0.0,         4.0*eiz_l,   0.0,    -6.0*eiz_l2,  0.0,          0.0,   0.0,         2.0*eiz_l,
        -ea_l,  0.0,          0.0,          0.0,   0.0,         0.0,         ea_l,   0.0,          0.0,          0.0,   0.0,         0.0,
        0.0,    -12.0*eiz_l3, 0.0,          0.0,   0.0,         -6.0*eiz_l2, 0.0,    12.0*eiz_l3,  0.0,          0.0,   0.0,         -6.0*eiz_l2,
        0.0,    0.0,          -12.0*eiy_l3, 0.0,   6.0*eiy_l2,  0.0,         0.0,    0.0,          12.0*eiy_l3,  0.0,   6.0*eiy_l2,  0.0,
        0.0,    0.0,          0.0,          -gj_l, 0.0,         0.0,         0.0,    0.0,          0.0,          gj_l,  0.0,         0.0,
        0.0,    0.0,          -6.0*eiy_l2,  0.0,   2.0*eiy_l,   0.0,         0.0,    0.0,          6.0*eiy_l2,   0.0,   4.0*eiy_l,   0.0,
        0.0,    6.0*eiz_l2,   0.0,          0.0,   0.0,         2.0*eiz_l,   0.0,    -6.0*eiz_l2,  0.0,          0.0,   0.0,         4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Static condensation of a 12x12 stiffness matrix for released member-end
/// DOFs. Released rows/columns come back zero.
pub fn condense_releases(k: &Mat12, releases: &[bool; 12]) -> Mat12 {
    let (kept, cut) = split_indices(releases);
    if cut.is_empty() {
        return *k;
    }

    let n1 = kept.len();
    let n2 = cut.len();

    let mut k11 = DMatrix::zeros(n1, n1);
    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ki) in kept.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            k11[(i, j)] = k[(ki, kj)];
        }
        for (j, &cj) in cut.iter().enumerate() {
            k12[(i, j)] = k[(ki, cj)];
        }
    }
    for (i, &ci) in cut.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            k21[(i, j)] = k[(ci, kj)];
        }
        for (j, &cj) in cut.iter().enumerate() {
            k22[(i, j)] = k[(ci, cj)];
        }
    }

    let k22_inv = match k22.try_inverse() {
        Some(inv) => inv,
        None => return *k,
    };
    let condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut out = Mat12::zeros();
    for (i, &ki) in kept.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            out[(ki, kj)] = condensed[(i, j)];
        }
    }
    out
}

/// Static condensation of a fixed-end force vector for released DOFs:
/// `fer1 - k12 * inv(k22) * fer2`, expanded back with zeros on released rows.
pub fn condense_fer(fer: &Vec12, k: &Mat12, releases: &[bool; 12]) -> Vec12 {
    let (kept, cut) = split_indices(releases);
    if cut.is_empty() {
        return *fer;
    }

    let n1 = kept.len();
    let n2 = cut.len();

    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k22 = DMatrix::zeros(n2, n2);
    for (i, &ki) in kept.iter().enumerate() {
        for (j, &cj) in cut.iter().enumerate() {
            k12[(i, j)] = k[(ki, cj)];
        }
    }
    for (i, &ci) in cut.iter().enumerate() {
        for (j, &cj) in cut.iter().enumerate() {
            k22[(i, j)] = k[(ci, cj)];
        }
    }

    let mut fer1 = DVector::zeros(n1);
    let mut fer2 = DVector::zeros(n2);
    for (i, &ki) in kept.iter().enumerate() {
        fer1[i] = fer[ki];
    }
    for (i, &ci) in cut.iter().enumerate() {
        fer2[i] = fer[ci];
    }

    let k22_inv = match k22.try_inverse() {
        Some(inv) => inv,
        None => return *fer,
    };
    let condensed = &fer1 - &k12 * &k22_inv * &fer2;

    let mut out = Vec12::zeros();
    for (i, &ki) in kept.iter().enumerate() {
        out[ki] = condensed[i];
    }
    out
}

/// Recover the displacements of released member-end DOFs by
/// back-substitution: the released partition carries no force, so
/// `K21*d1 + K22*d2 + FER2 = 0` gives `d2 = -inv(K22)*(K21*d1 + FER2)`.
/// Condensation decouples the released end from its node, so the nodal
/// rotation is not the member-end rotation; interpolating the deflected
/// shape needs the member-end values.
pub fn expand_released_displacements(
    d: &Vec12,
    fer: &Vec12,
    k: &Mat12,
    releases: &[bool; 12],
) -> Vec12 {
    let (kept, cut) = split_indices(releases);
    if cut.is_empty() {
        return *d;
    }

    let n1 = kept.len();
    let n2 = cut.len();

    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);
    for (i, &ci) in cut.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            k21[(i, j)] = k[(ci, kj)];
        }
        for (j, &cj) in cut.iter().enumerate() {
            k22[(i, j)] = k[(ci, cj)];
        }
    }

    let mut d1 = DVector::zeros(n1);
    for (i, &ki) in kept.iter().enumerate() {
        d1[i] = d[ki];
    }
    let mut fer2 = DVector::zeros(n2);
    for (i, &ci) in cut.iter().enumerate() {
        fer2[i] = fer[ci];
    }

    let k22_inv = match k22.try_inverse() {
        Some(inv) => inv,
        None => return *d,
    };
    let d2 = -(k22_inv * (k21 * d1 + fer2));

    let mut out = *d;
    for (i, &ci) in cut.iter().enumerate() {
        out[ci] = d2[i];
    }
    out
}

fn split_indices(releases: &[bool; 12]) -> (Vec<usize>, Vec<usize>) {
    let mut kept = Vec::new();
    let mut cut = Vec::new();
    for (i, &released) in releases.iter().enumerate() {
        if released {
            cut.push(i);
        } else {
            kept.push(i);
        }
    }
    (kept, cut)
}

/// Fixed-end force vector for a uniform load over the full member length.
/// `axis` selects the local load direction: 0 = x (axial), 1 = y, 2 = z.
pub fn fer_uniform_load(w: f64, length: f64, axis: usize) -> Vec12 {
    let l = length;
    let l2 = l * l;
    let mut fer = Vec12::zeros();

    match axis {
        0 => {
            fer[0] = -w * l / 2.0;
            fer[6] = -w * l / 2.0;
        }
        1 => {
            fer[1] = -w * l / 2.0;
            fer[5] = -w * l2 / 12.0;
            fer[7] = -w * l / 2.0;
            fer[11] = w * l2 / 12.0;
        }
        2 => {
            fer[2] = -w * l / 2.0;
            fer[4] = w * l2 / 12.0;
            fer[8] = -w * l / 2.0;
            fer[10] = -w * l2 / 12.0;
        }
        _ => {}
    }

    fer
}

/// An LU factorization with a numerical-singularity check on the pivots.
///
/// `lu().solve()` only rejects exact zero pivots, so a floating structure
/// whose stiffness matrix is singular to working precision can still
/// "solve" to garbage. Comparing the smallest and largest pivot magnitudes
/// catches that case.
pub struct CheckedLu {
    lu: nalgebra::LU<f64, nalgebra::Dyn, nalgebra::Dyn>,
}

impl CheckedLu {
    /// Factorize, returning `None` when the matrix is singular or
    /// numerically indistinguishable from singular.
    pub fn factorize(a: &Mat) -> Option<Self> {
        let lu = a.clone().lu();
        let u = lu.u();
        let mut min_pivot = f64::INFINITY;
        let mut max_pivot = 0.0_f64;
        for i in 0..u.nrows().min(u.ncols()) {
            let p = u[(i, i)].abs();
            min_pivot = min_pivot.min(p);
            max_pivot = max_pivot.max(p);
        }
        if max_pivot == 0.0 || min_pivot / max_pivot < PIVOT_RATIO_TOLERANCE {
            return None;
        }
        Some(Self { lu })
    }

    /// Solve for one right-hand side. Returns `None` on a non-finite result.
    pub fn solve(&self, b: &DVec) -> Option<DVec> {
        let x = self.lu.solve(b)?;
        if x.iter().all(|v| v.is_finite()) {
            Some(x)
        } else {
            None
        }
    }
}
