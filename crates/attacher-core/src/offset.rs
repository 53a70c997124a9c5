//! Attachment offset and flip composition
//!
//! The final placement is always `base ∘ flip ∘ offset`: the flip happens
//! first, then the user offset is applied in the flipped local frame. An
//! offset along X after a line flip therefore moves along the flipped
//! direction. This ordering is a hard invariant of the engine.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::mode::ArityClass;
use crate::placement::Placement;

/// User-supplied local offset: translation plus XYZ Euler rotation, both
/// interpreted in the local frame of the placement they are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttachOffset {
    pub xyz: [f32; 3],
    /// Roll, pitch, yaw in radians
    pub rpy: [f32; 3],
}

impl AttachOffset {
    /// The identity offset
    pub const IDENTITY: Self = Self {
        xyz: [0.0; 3],
        rpy: [0.0; 3],
    };

    /// Create from translation and rotation components
    pub fn new(xyz: [f32; 3], rpy: [f32; 3]) -> Self {
        Self { xyz, rpy }
    }

    /// A pure translation offset
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            xyz: [x, y, z],
            rpy: [0.0; 3],
        }
    }

    /// Whether this offset is the identity
    pub fn is_identity(&self) -> bool {
        self.xyz == [0.0; 3] && self.rpy == [0.0; 3]
    }

    /// Convert to a placement
    pub fn to_placement(&self) -> Placement {
        Placement {
            position: Vec3::from(self.xyz),
            rotation: Quat::from_euler(EulerRot::XYZ, self.rpy[0], self.rpy[1], self.rpy[2]),
        }
    }
}

/// The 180°-class transform applied by "flip sides".
///
/// Which axes invert is per arity family:
/// - Frame and Plane flip about local X: the normal (Z) and Y invert, X is
///   preserved.
/// - Line flips about local Z: the direction (X) and Y invert.
/// - Point placements have no sides; the flip is the identity.
pub fn flip_transform(arity: ArityClass) -> Placement {
    let rotation = match arity {
        ArityClass::Frame | ArityClass::Plane => Quat::from_rotation_x(std::f32::consts::PI),
        ArityClass::Line => Quat::from_rotation_z(std::f32::consts::PI),
        ArityClass::Point => Quat::IDENTITY,
    };
    Placement {
        position: Vec3::ZERO,
        rotation,
    }
}

/// Compose the final placement from a solved base, the flip flag and the
/// user offset. The offset is always applied after the flip.
pub fn compose(base: Placement, arity: ArityClass, flip: bool, offset: &AttachOffset) -> Placement {
    let flipped = if flip {
        base * flip_transform(arity)
    } else {
        base
    };
    if offset.is_identity() {
        return flipped;
    }
    flipped * offset.to_placement()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_offset_no_flip() {
        let base = Placement::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.8),
        );
        let composed = compose(base, ArityClass::Frame, false, &AttachOffset::IDENTITY);
        assert_eq!(composed, base);
    }

    #[test]
    fn test_flip_inverts_plane_normal() {
        let base = Placement::IDENTITY;
        let flipped = compose(base, ArityClass::Plane, true, &AttachOffset::IDENTITY);
        assert!((flipped.z_axis() - Vec3::NEG_Z).length() < 1e-6);
        assert!((flipped.x_axis() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_offset_follows_flip() {
        // Translating along local Z after a plane flip moves along -Z in
        // world space.
        let base = Placement::IDENTITY;
        let offset = AttachOffset::from_translation(0.0, 0.0, 1.0);
        let flipped = compose(base, ArityClass::Plane, true, &offset);
        assert!((flipped.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        let unflipped = compose(base, ArityClass::Plane, false, &offset);
        assert!((unflipped.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
        assert_ne!(flipped, unflipped);
    }

    #[test]
    fn test_point_flip_is_identity() {
        let base = Placement::from_translation(Vec3::new(4.0, 0.0, 0.0));
        let offset = AttachOffset::from_translation(1.0, 0.0, 0.0);
        assert_eq!(
            compose(base, ArityClass::Point, true, &offset),
            compose(base, ArityClass::Point, false, &offset)
        );
    }

    #[test]
    fn test_line_flip_reverses_direction() {
        let base = Placement::IDENTITY;
        let flipped = compose(base, ArityClass::Line, true, &AttachOffset::IDENTITY);
        assert!((flipped.x_axis() - Vec3::NEG_X).length() < 1e-6);
        assert!((flipped.z_axis() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_offset_rotation_in_local_frame() {
        let base = Placement::new(Vec3::ZERO, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let offset = AttachOffset::new([1.0, 0.0, 0.0], [0.0; 3]);
        let composed = compose(base, ArityClass::Frame, false, &offset);
        // Local X is world Y after the base rotation
        assert!((composed.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }
}
