//! Multi-point family
//!
//! Lines and planes built from explicit vertex sets, plus the global-axis
//! line modes. Required counts are enforced by the registry before these
//! solvers run.

use glam::Vec3;

use crate::error::AttachResult;
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{frame_with_z, kernel_err, line_frame, vertex_at};

pub(super) fn solve(id: ModeId, refs: &ValidatedReferences) -> AttachResult<Placement> {
    match id {
        ModeId::TwoPoints => {
            let p1 = vertex_at(refs, 0)?;
            let p2 = vertex_at(refs, 1)?;
            if (p2 - p1).length_squared() < 1e-12 {
                return Err(kernel_err("points coincide"));
            }
            line_frame(p1, p2 - p1)
        }
        ModeId::ThreePointsPlane => {
            let (p1, p2, p3) = three_points(refs)?;
            let normal = (p2 - p1).cross(p3 - p1);
            if normal.length_squared() < 1e-12 {
                return Err(kernel_err("points are collinear"));
            }
            frame_with_z(p1, normal, p2 - p1)
        }
        ModeId::ThreePointsNormal => {
            let (p1, p2, p3) = three_points(refs)?;
            let in_plane_normal = (p2 - p1).cross(p3 - p1);
            if in_plane_normal.length_squared() < 1e-12 {
                return Err(kernel_err("points are collinear"));
            }
            // Plane through the 1-2 line, perpendicular to the three-point
            // plane
            let normal = (p2 - p1).cross(in_plane_normal);
            frame_with_z(p1, normal, p2 - p1)
        }
        ModeId::AxisX => line_frame(vertex_at(refs, 0)?, Vec3::X),
        ModeId::AxisY => line_frame(vertex_at(refs, 0)?, Vec3::Y),
        ModeId::AxisZ => line_frame(vertex_at(refs, 0)?, Vec3::Z),
        _ => Err(crate::error::AttachError::Unknown),
    }
}

fn three_points(refs: &ValidatedReferences) -> AttachResult<(Vec3, Vec3, Vec3)> {
    Ok((vertex_at(refs, 0)?, vertex_at(refs, 1)?, vertex_at(refs, 2)?))
}
