//! Rigid placement (position + orientation)

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid placement: an origin and an orthonormal orientation frame.
///
/// Composition `a * b` applies `b` in `a`'s local frame, so a placement chain
/// reads left to right from the outermost frame inward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    /// The identity placement (origin, no rotation)
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a placement from position and rotation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a pure translation
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a placement from an origin and three orthonormal axes.
    ///
    /// The axes must already form a right-handed orthonormal frame.
    pub fn from_axes(origin: Vec3, x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self {
            position: origin,
            rotation: Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize(),
        }
    }

    /// Local X axis in world space
    pub fn x_axis(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local Y axis in world space
    pub fn y_axis(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local Z axis in world space
    pub fn z_axis(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Transform a point from local to world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Transform a direction from local to world space (no translation)
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Inverse placement
    pub fn inverse(&self) -> Self {
        let inv_rot = self.rotation.conjugate();
        Self {
            position: inv_rot * -self.position,
            rotation: inv_rot,
        }
    }

    /// Convert to a 4x4 matrix
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl std::ops::Mul for Placement {
    type Output = Placement;

    fn mul(self, rhs: Placement) -> Placement {
        Placement {
            position: self.position + self.rotation * rhs.position,
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}
