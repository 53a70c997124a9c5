//! Geometry consumed from the host document
//!
//! The attachment engine never owns shapes. Everything it knows about a
//! reference comes through the read-only [`GeometrySource`] query surface:
//! vertex positions, analytic curves and surfaces with their parametrization,
//! and mass properties for the inertial modes.

mod closest;
mod curve;
mod inertia;
mod surface;

use std::collections::HashMap;
use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::placement::Placement;
use crate::reference::{RefType, Reference};

pub use closest::closest_points;
pub use curve::Curve;
pub use inertia::{InertiaTensor, MassProperties, PrincipalAxes};
pub use surface::Surface;

/// Geometry behind an edge reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    /// The underlying analytic curve
    pub curve: Curve,
    /// Parameter range covered by the edge
    pub range: (f32, f32),
    /// Length, centroid and inertia of the edge
    pub props: MassProperties,
}

impl EdgeGeometry {
    /// Wrap a curve over its natural parameter range with point-like mass
    /// properties at the range midpoint.
    pub fn from_curve(curve: Curve) -> Self {
        let range = curve.natural_range();
        let mid = curve.point_at(0.5 * (range.0 + range.1));
        Self {
            curve,
            range,
            props: MassProperties::point(mid),
        }
    }

    /// Set explicit mass properties
    pub fn with_props(mut self, props: MassProperties) -> Self {
        self.props = props;
        self
    }

    /// Set an explicit parameter range
    pub fn with_range(mut self, range: (f32, f32)) -> Self {
        self.range = range;
        self
    }
}

/// Geometry behind a face reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceGeometry {
    /// The underlying analytic surface
    pub surface: Surface,
    /// Area, centroid and inertia of the face
    pub props: MassProperties,
}

impl FaceGeometry {
    /// Wrap a surface with point-like mass properties at its anchor point
    pub fn from_surface(surface: Surface) -> Self {
        let anchor = surface.anchor();
        Self {
            surface,
            props: MassProperties::point(anchor),
        }
    }

    /// Set explicit mass properties
    pub fn with_props(mut self, props: MassProperties) -> Self {
        self.props = props;
        self
    }
}

/// Geometry behind a whole-object reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGeometry {
    /// The object's own placement in world space
    pub placement: Placement,
    /// Volume, centroid and inertia of the object's shape
    pub props: MassProperties,
}

impl ObjectGeometry {
    /// An object with point-like mass properties at its origin
    pub fn from_placement(placement: Placement) -> Self {
        Self {
            placement,
            props: MassProperties::point(placement.position),
        }
    }

    /// Set explicit mass properties
    pub fn with_props(mut self, props: MassProperties) -> Self {
        self.props = props;
        self
    }
}

/// Geometry resolved for a single reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementGeometry {
    Vertex(Vec3),
    Edge(EdgeGeometry),
    Face(FaceGeometry),
    Object(ObjectGeometry),
}

impl ElementGeometry {
    /// The reference type this geometry corresponds to
    pub fn ref_type(&self) -> RefType {
        match self {
            ElementGeometry::Vertex(_) => RefType::Vertex,
            ElementGeometry::Edge(_) => RefType::Edge,
            ElementGeometry::Face(_) => RefType::Face,
            ElementGeometry::Object(_) => RefType::Object,
        }
    }

    /// Mass properties of the element (a vertex is a unit point mass)
    pub fn props(&self) -> MassProperties {
        match self {
            ElementGeometry::Vertex(p) => MassProperties::point(*p),
            ElementGeometry::Edge(e) => e.props,
            ElementGeometry::Face(f) => f.props,
            ElementGeometry::Object(o) => o.props,
        }
    }
}

/// Read-only geometric queries against externally owned objects.
///
/// The host document implements this; the engine performs no other I/O.
pub trait GeometrySource {
    /// Look up the geometry behind a reference address
    fn lookup(&self, reference: &Reference) -> Option<ElementGeometry>;

    /// Whether `object` transitively depends on `target` in the host
    /// document's dependency graph
    fn depends_on(&self, object: Uuid, target: Uuid) -> bool;
}

/// A map-backed [`GeometrySource`] with explicit dependency edges.
///
/// Host adapters can populate one per recompute pass; tests build scenes with
/// it directly.
#[derive(Debug, Default)]
pub struct MemorySource {
    elements: HashMap<Reference, ElementGeometry>,
    dependencies: HashMap<Uuid, HashSet<Uuid>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert geometry for a reference address
    pub fn insert(&mut self, reference: Reference, geometry: ElementGeometry) {
        self.elements.insert(reference, geometry);
    }

    /// Record that `object` directly depends on `target`
    pub fn add_dependency(&mut self, object: Uuid, target: Uuid) {
        self.dependencies.entry(object).or_default().insert(target);
    }
}

impl GeometrySource for MemorySource {
    fn lookup(&self, reference: &Reference) -> Option<ElementGeometry> {
        self.elements.get(reference).cloned()
    }

    fn depends_on(&self, object: Uuid, target: Uuid) -> bool {
        // Depth-first walk over the recorded dependency edges
        let mut stack = vec![object];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(next) = self.dependencies.get(&current) {
                stack.extend(next.iter().copied());
            }
        }
        false
    }
}

/// A deterministic unit vector perpendicular to `dir`.
///
/// Picks the world axis least aligned with `dir` and projects it out, so
/// nearby inputs give nearby outputs.
pub fn any_perpendicular(dir: Vec3) -> Vec3 {
    let a = dir.abs();
    let pick = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    dir.cross(pick).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_perpendicular() {
        for dir in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.3, -0.8, 0.5).normalize()] {
            let perp = any_perpendicular(dir);
            assert!(perp.dot(dir).abs() < 1e-6);
            assert!((perp.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_memory_source_dependencies() {
        let mut source = MemorySource::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        source.add_dependency(a, b);
        source.add_dependency(b, c);
        assert!(source.depends_on(a, c));
        assert!(source.depends_on(a, b));
        assert!(!source.depends_on(c, a));
    }

    #[test]
    fn test_memory_source_lookup() {
        let mut source = MemorySource::new();
        let obj = Uuid::new_v4();
        let reference = Reference::element(obj, "Vertex1");
        source.insert(reference.clone(), ElementGeometry::Vertex(Vec3::ONE));
        assert_eq!(
            source.lookup(&reference),
            Some(ElementGeometry::Vertex(Vec3::ONE))
        );
        assert_eq!(source.lookup(&Reference::object(obj)), None);
    }
}
