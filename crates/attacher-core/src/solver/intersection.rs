//! Intersection family
//!
//! Line of two intersecting planar faces. The folding and point-intersection
//! modes stay in the catalog but report `NotImplemented` so they remain
//! selectable and discoverable.

use crate::error::{AttachError, AttachResult};
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{face_at, kernel_err, line_frame};

pub(super) fn solve(id: ModeId, refs: &ValidatedReferences) -> AttachResult<Placement> {
    match id {
        ModeId::IntersectionLine => {
            let f1 = face_at(refs, 0)?;
            let f2 = face_at(refs, 1)?;
            let (o1, n1, _) = f1
                .surface
                .as_plane()
                .ok_or_else(|| kernel_err("intersection requires planar faces"))?;
            let (o2, n2, _) = f2
                .surface
                .as_plane()
                .ok_or_else(|| kernel_err("intersection requires planar faces"))?;

            let dir = n1.cross(n2);
            if dir.length_squared() < 1e-12 {
                return Err(kernel_err("faces are parallel"));
            }
            // Point on both planes, closest to the global origin
            let d1 = n1.dot(o1);
            let d2 = n2.dot(o2);
            let origin = (d1 * n2 - d2 * n1).cross(dir) / dir.length_squared();
            line_frame(origin, dir)
        }
        ModeId::IntersectionPoint | ModeId::Folding => Err(AttachError::NotImplemented),
        _ => Err(AttachError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ElementGeometry, FaceGeometry, MemorySource, Surface};
    use crate::mode::{ArityClass, ModeRegistry};
    use crate::reference::Reference;
    use crate::resolver::validate;
    use glam::Vec3;
    use uuid::Uuid;

    fn two_face_refs(s1: Surface, s2: Surface) -> ValidatedReferences {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let r1 = Reference::element(other, "Face1");
        let r2 = Reference::element(other, "Face2");
        let mut source = MemorySource::new();
        source.insert(
            r1.clone(),
            ElementGeometry::Face(FaceGeometry::from_surface(s1)),
        );
        source.insert(
            r2.clone(),
            ElementGeometry::Face(FaceGeometry::from_surface(s2)),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Line, ModeId::IntersectionLine)
            .unwrap();
        validate(feature, &[r1, r2], mode, &source).unwrap()
    }

    #[test]
    fn test_plane_plane_intersection() {
        // x = 2 and y = 3 intersect in a vertical line through (2, 3, 0)
        let refs = two_face_refs(
            Surface::plane(Vec3::new(2.0, 0.0, 0.0), Vec3::X),
            Surface::plane(Vec3::new(0.0, 3.0, 0.0), Vec3::Y),
        );
        let placement = solve(ModeId::IntersectionLine, &refs).unwrap();
        assert!((placement.position - Vec3::new(2.0, 3.0, 0.0)).length() < 1e-4);
        assert!(placement.x_axis().cross(Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_parallel_planes_fail() {
        let refs = two_face_refs(
            Surface::plane(Vec3::ZERO, Vec3::Z),
            Surface::plane(Vec3::new(0.0, 0.0, 5.0), Vec3::Z),
        );
        assert!(matches!(
            solve(ModeId::IntersectionLine, &refs),
            Err(AttachError::GeometryKernel(_))
        ));
    }

    #[test]
    fn test_curved_faces_fail() {
        let refs = two_face_refs(
            Surface::plane(Vec3::ZERO, Vec3::Z),
            Surface::cylinder(Vec3::ZERO, Vec3::Z, 1.0),
        );
        assert!(matches!(
            solve(ModeId::IntersectionLine, &refs),
            Err(AttachError::GeometryKernel(_))
        ));
    }

    #[test]
    fn test_folding_reports_not_implemented() {
        // Validation is exercised at the engine level; the solver contract
        // alone is checked here.
        let refs = two_face_refs(
            Surface::plane(Vec3::ZERO, Vec3::Z),
            Surface::plane(Vec3::ZERO, Vec3::X),
        );
        assert_eq!(
            solve(ModeId::Folding, &refs),
            Err(AttachError::NotImplemented)
        );
        assert_eq!(
            solve(ModeId::IntersectionPoint, &refs),
            Err(AttachError::NotImplemented)
        );
    }
}
