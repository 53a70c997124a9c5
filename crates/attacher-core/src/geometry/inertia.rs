//! Inertia tensors and mass properties
//!
//! The inertial attachment modes place frames on the principal axes of the
//! combined shape of all references, so this module carries a symmetric
//! tensor type, parallel-axis accumulation and a Jacobi eigen-solve.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Maximum Jacobi rotations before giving up on convergence
const JACOBI_MAX_ROTATIONS: usize = 64;

/// Inertia tensor (symmetric 3x3 matrix) in world axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaTensor {
    pub ixx: f32,
    pub ixy: f32,
    pub ixz: f32,
    pub iyy: f32,
    pub iyz: f32,
    pub izz: f32,
}

impl Default for InertiaTensor {
    fn default() -> Self {
        Self::ZERO
    }
}

impl InertiaTensor {
    /// The zero tensor (a point mass about its own centroid)
    pub const ZERO: Self = Self {
        ixx: 0.0,
        ixy: 0.0,
        ixz: 0.0,
        iyy: 0.0,
        iyz: 0.0,
        izz: 0.0,
    };

    /// Tensor of a solid box about its centroid
    pub fn solid_box(mass: f32, width: f32, height: f32, depth: f32) -> Self {
        let w2 = width * width;
        let h2 = height * height;
        let d2 = depth * depth;
        let k = mass / 12.0;
        Self {
            ixx: k * (h2 + d2),
            ixy: 0.0,
            ixz: 0.0,
            iyy: k * (w2 + d2),
            iyz: 0.0,
            izz: k * (w2 + h2),
        }
    }

    /// Tensor of a solid cylinder (axis along Z) about its centroid
    pub fn solid_cylinder(mass: f32, radius: f32, length: f32) -> Self {
        let r2 = radius * radius;
        let l2 = length * length;
        Self {
            ixx: mass * (3.0 * r2 + l2) / 12.0,
            ixy: 0.0,
            ixz: 0.0,
            iyy: mass * (3.0 * r2 + l2) / 12.0,
            iyz: 0.0,
            izz: mass * r2 / 2.0,
        }
    }

    /// Tensor of a solid sphere about its centroid
    pub fn solid_sphere(mass: f32, radius: f32) -> Self {
        let i = 2.0 * mass * radius * radius / 5.0;
        Self {
            ixx: i,
            ixy: 0.0,
            ixz: 0.0,
            iyy: i,
            iyz: 0.0,
            izz: i,
        }
    }

    /// Expand to a full symmetric matrix
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(self.ixx, self.ixy, self.ixz),
            Vec3::new(self.ixy, self.iyy, self.iyz),
            Vec3::new(self.ixz, self.iyz, self.izz),
        )
    }

    /// Component-wise sum
    pub fn add(&self, other: &Self) -> Self {
        Self {
            ixx: self.ixx + other.ixx,
            ixy: self.ixy + other.ixy,
            ixz: self.ixz + other.ixz,
            iyy: self.iyy + other.iyy,
            iyz: self.iyz + other.iyz,
            izz: self.izz + other.izz,
        }
    }

    /// Parallel-axis translation: the tensor of the same body about a point
    /// displaced by `offset` from its centroid.
    pub fn translated(&self, mass: f32, offset: Vec3) -> Self {
        let d2 = offset.length_squared();
        Self {
            ixx: self.ixx + mass * (d2 - offset.x * offset.x),
            ixy: self.ixy - mass * offset.x * offset.y,
            ixz: self.ixz - mass * offset.x * offset.z,
            iyy: self.iyy + mass * (d2 - offset.y * offset.y),
            iyz: self.iyz - mass * offset.y * offset.z,
            izz: self.izz + mass * (d2 - offset.z * offset.z),
        }
    }

    /// Principal moments and axes by cyclic Jacobi rotations.
    ///
    /// Moments come out ascending; axes are unit length, sign-fixed so the
    /// largest-magnitude component of each is non-negative, and the frame is
    /// forced right-handed.
    pub fn principal_axes(&self) -> PrincipalAxes {
        let mut a = self.to_mat3();
        let mut v = Mat3::IDENTITY;

        for _ in 0..JACOBI_MAX_ROTATIONS {
            // Largest off-diagonal element
            let pairs = [(0usize, 1usize), (0, 2), (1, 2)];
            let (p, q) = pairs
                .into_iter()
                .max_by(|l, r| {
                    let lv = a.col(l.1)[l.0].abs();
                    let rv = a.col(r.1)[r.0].abs();
                    lv.partial_cmp(&rv).unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or((0, 1));
            let apq = a.col(q)[p];
            if apq.abs() < 1e-9 {
                break;
            }

            let app = a.col(p)[p];
            let aqq = a.col(q)[q];
            let theta = 0.5 * (2.0 * apq).atan2(aqq - app);
            let (s, c) = theta.sin_cos();

            let mut g = [[0.0f32; 3]; 3];
            for (i, col) in g.iter_mut().enumerate() {
                col[i] = 1.0;
            }
            // Column-major: g[col][row]
            g[p][p] = c;
            g[q][q] = c;
            g[q][p] = -s;
            g[p][q] = s;
            let g = Mat3::from_cols_array_2d(&g);

            a = g.transpose() * a * g;
            v = v * g;
        }

        let mut entries = [
            (a.col(0)[0], v.col(0)),
            (a.col(1)[1], v.col(1)),
            (a.col(2)[2], v.col(2)),
        ];
        entries.sort_by(|l, r| l.0.partial_cmp(&r.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut axes = [Vec3::ZERO; 3];
        for (slot, (_, axis)) in axes.iter_mut().zip(entries.iter()) {
            *slot = fix_sign(axis.normalize());
        }
        // Right-handed frame: recompute the last axis
        axes[2] = axes[0].cross(axes[1]);

        PrincipalAxes {
            moments: Vec3::new(entries[0].0, entries[1].0, entries[2].0),
            axes,
        }
    }
}

/// Flip an eigenvector so its largest-magnitude component is non-negative
fn fix_sign(axis: Vec3) -> Vec3 {
    let a = axis.abs();
    let dominant = if a.x >= a.y && a.x >= a.z {
        axis.x
    } else if a.y >= a.z {
        axis.y
    } else {
        axis.z
    };
    if dominant < 0.0 { -axis } else { axis }
}

/// Principal moments (ascending) and the matching orthonormal axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    pub moments: Vec3,
    pub axes: [Vec3; 3],
}

/// Measure, centroid and inertia of one element.
///
/// `measure` is length for edges, area for faces and volume for whole
/// objects; at uniform density it doubles as the mass weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub measure: f32,
    pub centroid: Vec3,
    /// Inertia about the centroid, world axes
    pub inertia: InertiaTensor,
}

impl MassProperties {
    /// A unit point mass (used for vertices)
    pub fn point(position: Vec3) -> Self {
        Self {
            measure: 1.0,
            centroid: position,
            inertia: InertiaTensor::ZERO,
        }
    }

    /// Explicit properties
    pub fn new(measure: f32, centroid: Vec3, inertia: InertiaTensor) -> Self {
        Self {
            measure,
            centroid,
            inertia,
        }
    }

    /// Combine several elements into one body: total measure, weighted
    /// centroid, and the summed inertia about the combined centroid.
    ///
    /// None when the total measure vanishes.
    pub fn combine(items: &[MassProperties]) -> Option<MassProperties> {
        let total: f32 = items.iter().map(|p| p.measure).sum();
        if total <= 1e-9 {
            return None;
        }
        let centroid = items
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + p.measure * p.centroid)
            / total;
        let inertia = items.iter().fold(InertiaTensor::ZERO, |acc, p| {
            acc.add(&p.inertia.translated(p.measure, p.centroid - centroid))
        });
        Some(MassProperties {
            measure: total,
            centroid,
            inertia,
        })
    }
}
