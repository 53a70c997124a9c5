//! Coincidence family
//!
//! Origins snapped to vertices, orientations copied or axis-permuted from a
//! referenced object's placement. All axis-permutation variants run through
//! one procedure driven by a static pick table; local Z is recomputed as
//! X × Y, so every variant stays right-handed by construction.

use crate::error::{AttachError, AttachResult};
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{frame, line_frame, object_at, vertex_at};

/// Which of the object's axes provide local X and Y
struct AxisPick {
    x: usize,
    y: usize,
}

/// Static permutation table for the object-orientation modes
const AXIS_PICKS: &[(ModeId, AxisPick)] = &[
    (ModeId::ObjectXY, AxisPick { x: 0, y: 1 }),
    (ModeId::ObjectXZ, AxisPick { x: 0, y: 2 }),
    (ModeId::ObjectYZ, AxisPick { x: 1, y: 2 }),
    (ModeId::ObjectXYZ, AxisPick { x: 0, y: 1 }),
    (ModeId::ObjectXZY, AxisPick { x: 0, y: 2 }),
    (ModeId::ObjectYZX, AxisPick { x: 1, y: 2 }),
    (ModeId::ObjectYXZ, AxisPick { x: 1, y: 0 }),
    (ModeId::ObjectZXY, AxisPick { x: 2, y: 0 }),
    (ModeId::ObjectZYX, AxisPick { x: 2, y: 1 }),
];

/// Which of the object's axes carries a single-axis line mode
const LINE_PICKS: &[(ModeId, usize)] = &[
    (ModeId::ObjectX, 0),
    (ModeId::ObjectY, 1),
    (ModeId::ObjectZ, 2),
];

pub(super) fn solve(id: ModeId, refs: &ValidatedReferences) -> AttachResult<Placement> {
    match id {
        ModeId::Translate => {
            let position = vertex_at(refs, 0)?;
            Ok(Placement::from_translation(position))
        }
        ModeId::ObjectOrigin => {
            let object = object_at(refs, 0)?;
            Ok(Placement::from_translation(object.placement.position))
        }
        _ => {
            let object = object_at(refs, 0)?;
            let axes = [
                object.placement.x_axis(),
                object.placement.y_axis(),
                object.placement.z_axis(),
            ];
            // An indicator vertex relocates the origin off the object's own
            let origin = refs
                .indicator_vertex()
                .unwrap_or(object.placement.position);

            if let Some((_, axis)) = LINE_PICKS.iter().find(|(m, _)| *m == id) {
                return line_frame(origin, axes[*axis]);
            }
            let pick = AXIS_PICKS
                .iter()
                .find(|(m, _)| *m == id)
                .map(|(_, p)| p)
                .ok_or(AttachError::Unknown)?;
            frame(origin, axes[pick.x], axes[pick.y])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ElementGeometry, MemorySource, ObjectGeometry};
    use crate::mode::{ArityClass, ModeRegistry};
    use crate::reference::Reference;
    use crate::resolver::validate;
    use glam::{Quat, Vec3};
    use uuid::Uuid;

    fn object_refs(placement: Placement) -> (ValidatedReferences, Uuid) {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let reference = Reference::object(other);
        let mut source = MemorySource::new();
        source.insert(
            reference.clone(),
            ElementGeometry::Object(ObjectGeometry::from_placement(placement)),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Frame, ModeId::ObjectXY)
            .unwrap();
        let validated = validate(feature, &[reference], mode, &source).unwrap();
        (validated, feature)
    }

    #[test]
    fn test_translate() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let reference = Reference::element(other, "Vertex1");
        let mut source = MemorySource::new();
        source.insert(
            reference.clone(),
            ElementGeometry::Vertex(Vec3::new(1.0, 2.0, 3.0)),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Frame, ModeId::Translate)
            .unwrap();
        let refs = validate(feature, &[reference], mode, &source).unwrap();
        let placement = solve(ModeId::Translate, &refs).unwrap();
        assert_eq!(placement.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(placement.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_object_xy_copies_placement() {
        // Translated object with identity rotation: plane origin follows,
        // normal is the global Z axis.
        let (refs, _) = object_refs(Placement::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        let placement = solve(ModeId::ObjectXY, &refs).unwrap();
        assert!((placement.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        assert!((placement.z_axis() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_permutations_share_origin() {
        let base = Placement::new(
            Vec3::new(1.0, -1.0, 0.5),
            Quat::from_euler(glam::EulerRot::XYZ, 0.2, 0.4, -0.3),
        );
        let (refs, _) = object_refs(base);
        let xyz = solve(ModeId::ObjectXYZ, &refs).unwrap();
        let xzy = solve(ModeId::ObjectXZY, &refs).unwrap();
        let yzx = solve(ModeId::ObjectYZX, &refs).unwrap();
        assert_eq!(xyz.position, xzy.position);
        assert_eq!(xyz.position, yzx.position);
        // Fixed permutation relations between the variants
        assert!((xzy.x_axis() - base.x_axis()).length() < 1e-5);
        assert!((xzy.y_axis() - base.z_axis()).length() < 1e-5);
        assert!((xzy.z_axis() + base.y_axis()).length() < 1e-5);
        assert!((yzx.x_axis() - base.y_axis()).length() < 1e-5);
        assert!((yzx.y_axis() - base.z_axis()).length() < 1e-5);
        assert!((yzx.z_axis() - base.x_axis()).length() < 1e-5);
    }

    #[test]
    fn test_object_axis_line() {
        let base = Placement::new(Vec3::new(3.0, 0.0, 0.0), Quat::from_rotation_z(0.7));
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let reference = Reference::object(other);
        let mut source = MemorySource::new();
        source.insert(
            reference.clone(),
            ElementGeometry::Object(ObjectGeometry::from_placement(base)),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Line, ModeId::ObjectY)
            .unwrap();
        let refs = validate(feature, &[reference], mode, &source).unwrap();
        let placement = solve(ModeId::ObjectY, &refs).unwrap();
        assert_eq!(placement.position, base.position);
        assert!((placement.x_axis() - base.y_axis()).length() < 1e-5);
    }
}
