//! Differential-geometry family
//!
//! Frenet frames along curves, tangent planes and parametric tangents on
//! surfaces, and the curvature-derived modes (concentric, revolution
//! section, axis/center of curvature).

use crate::error::AttachResult;
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{
    SolveInput, edge_at, edge_parameter, face_at, frame, frame_with_z, kernel_err, line_frame,
    vertex_at,
};

/// Which Frenet axes (0 = tangent, 1 = normal, 2 = binormal) land on the
/// placement's local X and Y
const FRENET_PICKS: &[(ModeId, (usize, usize))] = &[
    (ModeId::FrenetNB, (1, 2)),
    (ModeId::FrenetTN, (0, 1)),
    (ModeId::FrenetTB, (0, 2)),
];

pub(super) fn solve(
    id: ModeId,
    refs: &ValidatedReferences,
    input: &SolveInput,
) -> AttachResult<Placement> {
    match id {
        ModeId::FlatFace => {
            let face = face_at(refs, 0)?;
            let (origin, normal, x_dir) = face
                .surface
                .as_plane()
                .ok_or_else(|| kernel_err("flat face requires a planar face"))?;
            frame_with_z(origin, normal, x_dir)
        }
        ModeId::TangentPlane => {
            let face = face_at(refs, 0)?;
            let vertex = vertex_at(refs, 1)?;
            let point = face.surface.project(vertex);
            let normal = face.surface.normal_at(point);
            let (u, _) = face.surface.tangents_at(point);
            frame_with_z(point, normal, u)
        }
        ModeId::TangentU | ModeId::TangentV => {
            let face = face_at(refs, 0)?;
            let vertex = vertex_at(refs, 1)?;
            let point = face.surface.project(vertex);
            let (u, v) = face.surface.tangents_at(point);
            let dir = if id == ModeId::TangentU { u } else { v };
            line_frame(point, dir)
        }
        ModeId::NormalToEdge => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let origin = edge.curve.point_at(t);
            let tangent = edge.curve.d1(t);
            // X points at the center of curvature when there is one
            match edge.curve.frenet(t) {
                Some((tangent, normal, _)) => frame_with_z(origin, tangent, normal),
                None => frame_with_z(origin, tangent, tangent),
            }
        }
        ModeId::FrenetNB | ModeId::FrenetTN | ModeId::FrenetTB => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let (tangent, normal, binormal) = edge.curve.frenet(t).ok_or_else(|| {
                kernel_err(format!("{} has no curvature", edge.curve.kind_name()))
            })?;
            let axes = [tangent, normal, binormal];
            let (x, y) = FRENET_PICKS
                .iter()
                .find(|(m, _)| *m == id)
                .map(|(_, pick)| *pick)
                .unwrap_or((0, 1));
            frame(edge.curve.point_at(t), axes[x], axes[y])
        }
        ModeId::Concentric => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let center = edge.curve.center_of_curvature(t).ok_or_else(|| {
                kernel_err(format!("{} has no center of curvature", edge.curve.kind_name()))
            })?;
            let (_, normal, binormal) = edge.curve.frenet(t).ok_or_else(|| {
                kernel_err(format!("{} has no curvature", edge.curve.kind_name()))
            })?;
            // Z along the osculating-circle axis, X from the center toward
            // the curve point
            frame_with_z(center, binormal, -normal)
        }
        ModeId::RevolutionSection => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let center = edge.curve.center_of_curvature(t).ok_or_else(|| {
                kernel_err(format!("{} has no center of curvature", edge.curve.kind_name()))
            })?;
            let (tangent, _, binormal) = edge.curve.frenet(t).ok_or_else(|| {
                kernel_err(format!("{} has no curvature", edge.curve.kind_name()))
            })?;
            // The section plane contains the revolution axis: normal runs
            // along the tangent, X along the axis
            frame_with_z(center, tangent, binormal)
        }
        ModeId::AxisOfCurvature => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let center = edge.curve.center_of_curvature(t).ok_or_else(|| {
                kernel_err(format!("{} has no center of curvature", edge.curve.kind_name()))
            })?;
            let (_, _, binormal) = edge.curve.frenet(t).ok_or_else(|| {
                kernel_err(format!("{} has no curvature", edge.curve.kind_name()))
            })?;
            line_frame(center, binormal)
        }
        ModeId::CenterOfCurvature => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            let center = edge.curve.center_of_curvature(t).ok_or_else(|| {
                kernel_err(format!("{} has no center of curvature", edge.curve.kind_name()))
            })?;
            Ok(Placement::from_translation(center))
        }
        _ => Err(crate::error::AttachError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Curve, EdgeGeometry, ElementGeometry, FaceGeometry, MemorySource, Surface};
    use crate::mode::{ArityClass, ModeRegistry};
    use crate::reference::Reference;
    use crate::resolver::validate;
    use glam::Vec3;
    use std::f32::consts::TAU;
    use uuid::Uuid;

    fn circle_edge_refs(arity: ArityClass, id: ModeId, indicator: Option<Vec3>) -> ValidatedReferences {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let edge = Reference::element(other, "Edge1");
        let circle = Curve::Circle {
            center: Vec3::new(0.0, 0.0, 1.0),
            axis: Vec3::Z,
            x_dir: Vec3::X,
            radius: 2.0,
        };
        let mut source = MemorySource::new();
        source.insert(
            edge.clone(),
            ElementGeometry::Edge(
                EdgeGeometry::from_curve(circle).with_range((0.0, TAU)),
            ),
        );
        let mut refs = vec![edge];
        if let Some(p) = indicator {
            let vertex = Reference::element(other, "Vertex1");
            source.insert(vertex.clone(), ElementGeometry::Vertex(p));
            refs.push(vertex);
        }
        let mode = ModeRegistry::global().get(arity, id).unwrap();
        validate(feature, &refs, mode, &source).unwrap()
    }

    #[test]
    fn test_flat_face() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let face = Reference::element(other, "Face1");
        let mut source = MemorySource::new();
        source.insert(
            face.clone(),
            ElementGeometry::Face(FaceGeometry::from_surface(Surface::plane_with_x(
                Vec3::new(0.0, 0.0, 4.0),
                Vec3::Z,
                Vec3::X,
            ))),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Plane, ModeId::FlatFace)
            .unwrap();
        let refs = validate(feature, &[face], mode, &source).unwrap();
        let placement = solve(ModeId::FlatFace, &refs, &SolveInput::default()).unwrap();
        assert!((placement.position - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-6);
        assert!((placement.z_axis() - Vec3::Z).length() < 1e-6);
        assert!((placement.x_axis() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_flat_face_rejects_curved() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let face = Reference::element(other, "Face1");
        let mut source = MemorySource::new();
        source.insert(
            face.clone(),
            ElementGeometry::Face(FaceGeometry::from_surface(Surface::cylinder(
                Vec3::ZERO,
                Vec3::Z,
                1.0,
            ))),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Plane, ModeId::FlatFace)
            .unwrap();
        let refs = validate(feature, &[face], mode, &source).unwrap();
        assert!(matches!(
            solve(ModeId::FlatFace, &refs, &SolveInput::default()),
            Err(crate::error::AttachError::GeometryKernel(_))
        ));
    }

    #[test]
    fn test_frenet_nb_on_circle() {
        let refs = circle_edge_refs(ArityClass::Frame, ModeId::FrenetNB, None);
        let placement = solve(ModeId::FrenetNB, &refs, &SolveInput::default()).unwrap();
        // At t=0 the point is (2,0,1); the osculating plane of a circle is
        // its own plane, so Z (tangent) runs along +Y.
        assert!((placement.position - Vec3::new(2.0, 0.0, 1.0)).length() < 1e-5);
        assert!((placement.x_axis() - Vec3::NEG_X).length() < 1e-5);
        assert!((placement.z_axis() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_concentric_center_and_axis() {
        let refs = circle_edge_refs(ArityClass::Frame, ModeId::Concentric, None);
        let placement = solve(ModeId::Concentric, &refs, &SolveInput::default()).unwrap();
        assert!((placement.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
        assert!((placement.z_axis() - Vec3::Z).length() < 1e-4);
        // X points from the center toward the curve point at t=0
        assert!((placement.x_axis() - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_indicator_vertex_picks_parameter() {
        // Indicator near the circle's +Y quadrant moves the frame there.
        let refs = circle_edge_refs(
            ArityClass::Frame,
            ModeId::FrenetNB,
            Some(Vec3::new(0.0, 7.0, 1.0)),
        );
        let placement = solve(ModeId::FrenetNB, &refs, &SolveInput::default()).unwrap();
        assert!((placement.position - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_normal_to_straight_edge() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let edge = Reference::element(other, "Edge1");
        let mut source = MemorySource::new();
        source.insert(
            edge.clone(),
            ElementGeometry::Edge(
                EdgeGeometry::from_curve(Curve::line(Vec3::ZERO, Vec3::Y))
                    .with_range((0.0, 10.0)),
            ),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Plane, ModeId::NormalToEdge)
            .unwrap();
        let refs = validate(feature, &[edge], mode, &source).unwrap();
        let input = SolveInput { parameter: 0.5 };
        let placement = solve(ModeId::NormalToEdge, &refs, &input).unwrap();
        assert!((placement.position - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-4);
        assert!((placement.z_axis() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_tangent_plane_on_sphere() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let face = Reference::element(other, "Face1");
        let vertex = Reference::element(other, "Vertex1");
        let mut source = MemorySource::new();
        source.insert(
            face.clone(),
            ElementGeometry::Face(FaceGeometry::from_surface(Surface::sphere(
                Vec3::ZERO,
                2.0,
            ))),
        );
        source.insert(
            vertex.clone(),
            ElementGeometry::Vertex(Vec3::new(5.0, 0.0, 0.0)),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Plane, ModeId::TangentPlane)
            .unwrap();
        let refs = validate(feature, &[face, vertex], mode, &source).unwrap();
        let placement = solve(ModeId::TangentPlane, &refs, &SolveInput::default()).unwrap();
        assert!((placement.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((placement.z_axis() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_frenet_rejects_straight_line() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let edge = Reference::element(other, "Edge1");
        let mut source = MemorySource::new();
        source.insert(
            edge.clone(),
            ElementGeometry::Edge(EdgeGeometry::from_curve(Curve::line(Vec3::ZERO, Vec3::X))),
        );
        let mode = ModeRegistry::global()
            .get(ArityClass::Frame, ModeId::FrenetNB)
            .unwrap();
        let refs = validate(feature, &[edge], mode, &source).unwrap();
        assert!(matches!(
            solve(ModeId::FrenetNB, &refs, &SolveInput::default()),
            Err(crate::error::AttachError::GeometryKernel(_))
        ));
    }
}
