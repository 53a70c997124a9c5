//! Placement solver families
//!
//! One deterministic procedure per mode, dispatched by mode id. Solvers are
//! pure: they read validated reference geometry plus the engine's path
//! parameter and produce a full origin + orthonormal orientation, or a
//! tagged failure.

mod coincidence;
mod diffgeom;
mod inertial;
mod intersection;
mod multipoint;
mod parametric;
mod proximity;

use glam::Vec3;

use crate::error::{AttachError, AttachResult};
use crate::geometry::{
    Curve, EdgeGeometry, FaceGeometry, ObjectGeometry, any_perpendicular,
};
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

/// Solver inputs that are engine state rather than references
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveInput {
    /// Normalized path parameter in [0, 1], used by curve-based modes when
    /// no indicator vertex is supplied
    pub parameter: f32,
}

impl Default for SolveInput {
    fn default() -> Self {
        Self { parameter: 0.0 }
    }
}

/// Solve the base placement for a validated mode
pub fn solve(id: ModeId, refs: &ValidatedReferences, input: &SolveInput) -> AttachResult<Placement> {
    use ModeId::*;
    match id {
        Translate | ObjectXY | ObjectXZ | ObjectYZ | ObjectXYZ | ObjectXZY | ObjectYZX
        | ObjectYXZ | ObjectZXY | ObjectZYX | ObjectX | ObjectY | ObjectZ | ObjectOrigin => {
            coincidence::solve(id, refs)
        }
        FlatFace | TangentPlane | TangentU | TangentV | NormalToEdge | FrenetNB | FrenetTN
        | FrenetTB | Concentric | RevolutionSection | AxisOfCurvature | CenterOfCurvature => {
            diffgeom::solve(id, refs, input)
        }
        OnVertex | OnEdge | Focus1 | Focus2 | Directrix1 | Directrix2 | Asymptote1
        | Asymptote2 | CenterOfMass => parametric::solve(id, refs, input),
        TwoPoints | ThreePointsPlane | ThreePointsNormal | AxisX | AxisY | AxisZ => {
            multipoint::solve(id, refs)
        }
        InertialCs | InertiaAxis1 | InertiaAxis2 | InertiaAxis3 => inertial::solve(id, refs),
        ProximityPoint1 | ProximityPoint2 | ProximityLine => proximity::solve(id, refs),
        IntersectionLine | IntersectionPoint | Folding => intersection::solve(id, refs),
    }
}

/// Shorthand for a geometry-kernel failure
pub(crate) fn kernel_err(message: impl Into<String>) -> AttachError {
    AttachError::GeometryKernel(message.into())
}

/// Orthonormal right-handed frame from origin, X direction and an
/// approximate Y direction.
pub(crate) fn frame(origin: Vec3, x: Vec3, y_hint: Vec3) -> AttachResult<Placement> {
    let x = x
        .try_normalize()
        .ok_or_else(|| kernel_err("degenerate X direction"))?;
    let z = x
        .cross(y_hint)
        .try_normalize()
        .ok_or_else(|| kernel_err("degenerate frame: X and Y are parallel"))?;
    let y = z.cross(x);
    Ok(Placement::from_axes(origin, x, y, z))
}

/// Frame from origin and Z direction, X taken from `x_hint` (projected into
/// the plane) or chosen deterministically when the hint is degenerate.
pub(crate) fn frame_with_z(origin: Vec3, z: Vec3, x_hint: Vec3) -> AttachResult<Placement> {
    let z = z
        .try_normalize()
        .ok_or_else(|| kernel_err("degenerate Z direction"))?;
    let projected = x_hint - x_hint.dot(z) * z;
    let x = projected
        .try_normalize()
        .unwrap_or_else(|| any_perpendicular(z));
    let y = z.cross(x);
    Ok(Placement::from_axes(origin, x, y, z))
}

/// Line placement: local X runs along the line
pub(crate) fn line_frame(origin: Vec3, dir: Vec3) -> AttachResult<Placement> {
    let x = dir
        .try_normalize()
        .ok_or_else(|| kernel_err("degenerate line direction"))?;
    let y = any_perpendicular(x);
    frame(origin, x, y)
}

// Typed accessors for post-validation reference geometry. A mismatch here
// means the registry requirement and the solver disagree.

pub(crate) fn vertex_at(refs: &ValidatedReferences, index: usize) -> AttachResult<Vec3> {
    match refs.geometry(index) {
        Some(crate::geometry::ElementGeometry::Vertex(p)) => Ok(*p),
        _ => Err(AttachError::Unknown),
    }
}

pub(crate) fn edge_at(refs: &ValidatedReferences, index: usize) -> AttachResult<&EdgeGeometry> {
    match refs.geometry(index) {
        Some(crate::geometry::ElementGeometry::Edge(e)) => Ok(e),
        _ => Err(AttachError::Unknown),
    }
}

pub(crate) fn face_at(refs: &ValidatedReferences, index: usize) -> AttachResult<&FaceGeometry> {
    match refs.geometry(index) {
        Some(crate::geometry::ElementGeometry::Face(f)) => Ok(f),
        _ => Err(AttachError::Unknown),
    }
}

pub(crate) fn object_at(refs: &ValidatedReferences, index: usize) -> AttachResult<&ObjectGeometry> {
    match refs.geometry(index) {
        Some(crate::geometry::ElementGeometry::Object(o)) => Ok(o),
        _ => Err(AttachError::Unknown),
    }
}

/// The curve parameter a path-based mode works at: the indicator vertex's
/// projection when one is supplied, otherwise the engine's normalized path
/// parameter mapped into the edge range.
pub(crate) fn edge_parameter(
    edge: &EdgeGeometry,
    refs: &ValidatedReferences,
    input: &SolveInput,
) -> f32 {
    match refs.indicator_vertex() {
        Some(point) => edge.curve.project(point, edge.range),
        None => Curve::param_at_fraction(edge.range, input.parameter),
    }
}
