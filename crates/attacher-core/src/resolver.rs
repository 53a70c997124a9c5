//! Reference validation
//!
//! Checks a candidate reference list against a mode's requirements before any
//! solving happens. Permanent rejections (self-reference, dependency cycles)
//! are detected first so they are never masked by a count or type problem the
//! user could fix by adding references.

use glam::Vec3;
use uuid::Uuid;

use crate::error::{AttachError, AttachResult};
use crate::geometry::{ElementGeometry, GeometrySource};
use crate::mode::AttachmentMode;
use crate::reference::Reference;

/// A reference with its resolved geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub reference: Reference,
    pub geometry: ElementGeometry,
}

/// References that passed validation for a mode, geometry attached
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReferences {
    items: Vec<ResolvedReference>,
    required: usize,
}

impl ValidatedReferences {
    /// Number of references
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reference + geometry at `index`
    pub fn get(&self, index: usize) -> Option<&ResolvedReference> {
        self.items.get(index)
    }

    /// Geometry at `index`
    pub fn geometry(&self, index: usize) -> Option<&ElementGeometry> {
        self.items.get(index).map(|r| &r.geometry)
    }

    /// Iterate over references with geometry
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedReference> {
        self.items.iter()
    }

    /// The indicator vertex position, when one was supplied beyond the
    /// mode's required references.
    pub fn indicator_vertex(&self) -> Option<Vec3> {
        if self.items.len() <= self.required {
            return None;
        }
        match self.items.last().map(|r| &r.geometry) {
            Some(ElementGeometry::Vertex(p)) => Some(*p),
            _ => None,
        }
    }
}

/// Validate `references` against `mode` for the feature being placed.
///
/// Pure apart from read-only lookups on `source`. On success every reference
/// comes back with its geometry resolved.
pub fn validate(
    feature: Uuid,
    references: &[Reference],
    mode: &AttachmentMode,
    source: &dyn GeometrySource,
) -> AttachResult<ValidatedReferences> {
    // Permanent rejections come first
    for reference in references {
        if reference.object == feature {
            return Err(AttachError::SelfReference);
        }
    }
    for reference in references {
        if source.depends_on(reference.object, feature) {
            return Err(AttachError::CyclicDependency);
        }
    }

    if references.len() < mode.min_refs() {
        return Err(AttachError::InsufficientReferences {
            needed: mode.min_refs(),
            got: references.len(),
        });
    }

    let mut items = Vec::with_capacity(references.len());
    for (slot, reference) in references.iter().enumerate() {
        let geometry = source.lookup(reference).ok_or_else(|| {
            AttachError::GeometryKernel(format!("reference {} not found", reference))
        })?;
        let found = geometry.ref_type();
        if !mode.accepts_slot(slot, found) {
            return Err(AttachError::WrongReferenceType { index: slot, found });
        }
        items.push(ResolvedReference {
            reference: reference.clone(),
            geometry,
        });
    }

    Ok(ValidatedReferences {
        items,
        required: mode.min_refs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{EdgeGeometry, Curve, MemorySource};
    use crate::mode::{ArityClass, ModeId, ModeRegistry};

    fn vertex_source(positions: &[(Reference, Vec3)]) -> MemorySource {
        let mut source = MemorySource::new();
        for (reference, position) in positions {
            source.insert(reference.clone(), ElementGeometry::Vertex(*position));
        }
        source
    }

    #[test]
    fn test_self_reference_beats_count() {
        let feature = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Line, ModeId::TwoPoints).unwrap();
        // One reference only, and it points at the feature itself: the
        // permanent rejection wins over the missing-count error.
        let refs = vec![Reference::element(feature, "Vertex1")];
        let source = MemorySource::new();
        assert_eq!(
            validate(feature, &refs, mode, &source),
            Err(AttachError::SelfReference)
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let feature = Uuid::new_v4();
        let upstream = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Point, ModeId::OnVertex).unwrap();
        let reference = Reference::element(upstream, "Vertex1");
        let mut source = vertex_source(&[(reference.clone(), Vec3::ZERO)]);
        source.add_dependency(upstream, feature);
        assert_eq!(
            validate(feature, &[reference], mode, &source),
            Err(AttachError::CyclicDependency)
        );
    }

    #[test]
    fn test_insufficient_references() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Line, ModeId::TwoPoints).unwrap();
        let reference = Reference::element(other, "Vertex1");
        let source = vertex_source(&[(reference.clone(), Vec3::ZERO)]);
        assert_eq!(
            validate(feature, &[reference], mode, &source),
            Err(AttachError::InsufficientReferences { needed: 2, got: 1 })
        );
    }

    #[test]
    fn test_wrong_type() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Point, ModeId::OnVertex).unwrap();
        let reference = Reference::element(other, "Edge1");
        let mut source = MemorySource::new();
        source.insert(
            reference.clone(),
            ElementGeometry::Edge(EdgeGeometry::from_curve(Curve::line(Vec3::ZERO, Vec3::X))),
        );
        let result = validate(feature, &[reference], mode, &source);
        assert!(matches!(
            result,
            Err(AttachError::WrongReferenceType { index: 0, .. })
        ));
    }

    #[test]
    fn test_surplus_reference_is_wrong_type() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Point, ModeId::OnVertex).unwrap();
        let r1 = Reference::element(other, "Vertex1");
        let r2 = Reference::element(other, "Vertex2");
        let source = vertex_source(&[
            (r1.clone(), Vec3::ZERO),
            (r2.clone(), Vec3::ONE),
        ]);
        let result = validate(feature, &[r1, r2], mode, &source);
        assert!(matches!(
            result,
            Err(AttachError::WrongReferenceType { index: 1, .. })
        ));
    }

    #[test]
    fn test_missing_geometry_is_kernel_error() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Point, ModeId::OnVertex).unwrap();
        let reference = Reference::element(other, "Vertex1");
        let source = MemorySource::new();
        assert!(matches!(
            validate(feature, &[reference], mode, &source),
            Err(AttachError::GeometryKernel(_))
        ));
    }

    #[test]
    fn test_valid_with_indicator_vertex() {
        let feature = Uuid::new_v4();
        let other = Uuid::new_v4();
        let registry = ModeRegistry::global();
        let mode = registry.get(ArityClass::Point, ModeId::OnEdge).unwrap();
        let edge = Reference::element(other, "Edge1");
        let vertex = Reference::element(other, "Vertex1");
        let mut source = MemorySource::new();
        source.insert(
            edge.clone(),
            ElementGeometry::Edge(EdgeGeometry::from_curve(Curve::line(Vec3::ZERO, Vec3::X))),
        );
        source.insert(
            vertex.clone(),
            ElementGeometry::Vertex(Vec3::new(3.0, 1.0, 0.0)),
        );
        let validated = validate(feature, &[edge, vertex], mode, &source).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(
            validated.indicator_vertex(),
            Some(Vec3::new(3.0, 1.0, 0.0))
        );
    }
}
