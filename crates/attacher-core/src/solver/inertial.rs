//! Inertial family
//!
//! Principal axes of inertia and center of mass of the combined shape of all
//! references, at uniform density. Axes come out ordered by ascending
//! principal moment with deterministic signs, so re-solving the same inputs
//! reproduces the same frame exactly.

use crate::error::AttachResult;
use crate::geometry::MassProperties;
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{frame, kernel_err, line_frame};

pub(super) fn solve(id: ModeId, refs: &ValidatedReferences) -> AttachResult<Placement> {
    let props: Vec<MassProperties> = refs.iter().map(|r| r.geometry.props()).collect();
    let combined = MassProperties::combine(&props)
        .ok_or_else(|| kernel_err("references have zero total measure"))?;
    let principal = combined.inertia.principal_axes();

    match id {
        ModeId::InertialCs => frame(
            combined.centroid,
            principal.axes[0],
            principal.axes[1],
        ),
        ModeId::InertiaAxis1 => line_frame(combined.centroid, principal.axes[0]),
        ModeId::InertiaAxis2 => line_frame(combined.centroid, principal.axes[1]),
        ModeId::InertiaAxis3 => line_frame(combined.centroid, principal.axes[2]),
        _ => Err(crate::error::AttachError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ElementGeometry, MemorySource};
    use crate::mode::{ArityClass, ModeRegistry};
    use crate::reference::Reference;
    use crate::resolver::validate;
    use glam::Vec3;
    use uuid::Uuid;

    fn vertex_cloud(id: ModeId, arity: ArityClass, points: &[Vec3]) -> ValidatedReferences {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut source = MemorySource::new();
        let refs: Vec<Reference> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let reference = Reference::element(other, format!("Vertex{}", i + 1));
                source.insert(reference.clone(), ElementGeometry::Vertex(*p));
                reference
            })
            .collect();
        let mode = ModeRegistry::global().get(arity, id).unwrap();
        validate(feature, &refs, mode, &source).unwrap()
    }

    #[test]
    fn test_inertial_cs_of_elongated_cloud() {
        // Four points stretched along X: the smallest-moment axis (local X)
        // runs along the stretch.
        let refs = vertex_cloud(
            ModeId::InertialCs,
            ArityClass::Frame,
            &[
                Vec3::new(-4.0, 0.0, 1.0),
                Vec3::new(4.0, 0.0, 1.0),
                Vec3::new(0.0, 0.5, 1.0),
                Vec3::new(0.0, -0.5, 1.0),
            ],
        );
        let placement = solve(ModeId::InertialCs, &refs).unwrap();
        assert!((placement.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert!(placement.x_axis().dot(Vec3::X).abs() > 0.999);
    }

    #[test]
    fn test_inertia_axis_line() {
        let refs = vertex_cloud(
            ModeId::InertiaAxis1,
            ArityClass::Line,
            &[
                Vec3::new(-3.0, 2.0, 0.0),
                Vec3::new(3.0, 2.0, 0.0),
                Vec3::new(0.0, 2.5, 0.0),
                Vec3::new(0.0, 1.5, 0.0),
            ],
        );
        let placement = solve(ModeId::InertiaAxis1, &refs).unwrap();
        assert!((placement.position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        assert!(placement.x_axis().dot(Vec3::X).abs() > 0.999);
    }

    #[test]
    fn test_idempotent_frame() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.2, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        let refs = vertex_cloud(ModeId::InertialCs, ArityClass::Frame, &points);
        let first = solve(ModeId::InertialCs, &refs).unwrap();
        let second = solve(ModeId::InertialCs, &refs).unwrap();
        assert_eq!(first, second);
    }
}
