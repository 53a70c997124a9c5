//! Attachment mode catalog and registry
//!
//! The catalog is fixed at construction time: every mode the engine knows,
//! keyed by (arity class, mode id), with its reference requirements. Modes
//! that share a procedure up to an axis permutation are separate catalog
//! entries dispatched through one parametrized solver, so near-duplicate
//! captions never grow their own code.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::reference::RefType;

/// Grouping of modes by the dimensionality of what is being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArityClass {
    Point,
    Line,
    Plane,
    Frame,
}

impl ArityClass {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ArityClass::Point => "Point",
            ArityClass::Line => "Line",
            ArityClass::Plane => "Plane",
            ArityClass::Frame => "Frame",
        }
    }

    /// All arity classes
    pub fn all() -> &'static [ArityClass] {
        &[
            ArityClass::Point,
            ArityClass::Line,
            ArityClass::Plane,
            ArityClass::Frame,
        ]
    }
}

/// Identifier of an attachment procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeId {
    // Coincidence family
    Translate,
    ObjectXY,
    ObjectXZ,
    ObjectYZ,
    ObjectXYZ,
    ObjectXZY,
    ObjectYZX,
    ObjectYXZ,
    ObjectZXY,
    ObjectZYX,
    ObjectX,
    ObjectY,
    ObjectZ,
    ObjectOrigin,
    // Surface family
    FlatFace,
    TangentPlane,
    TangentU,
    TangentV,
    // Differential-geometry family
    NormalToEdge,
    FrenetNB,
    FrenetTN,
    FrenetTB,
    Concentric,
    RevolutionSection,
    AxisOfCurvature,
    CenterOfCurvature,
    // Parametric-point family
    OnVertex,
    OnEdge,
    Focus1,
    Focus2,
    Directrix1,
    Directrix2,
    Asymptote1,
    Asymptote2,
    CenterOfMass,
    // Multi-point family
    TwoPoints,
    ThreePointsPlane,
    ThreePointsNormal,
    AxisX,
    AxisY,
    AxisZ,
    // Inertial family
    InertialCs,
    InertiaAxis1,
    InertiaAxis2,
    InertiaAxis3,
    // Proximity family
    ProximityPoint1,
    ProximityPoint2,
    ProximityLine,
    // Intersection family
    IntersectionLine,
    IntersectionPoint,
    Folding,
}

impl ModeId {
    /// The caption shown in pickers and status strings
    pub fn caption(&self) -> &'static str {
        match self {
            ModeId::Translate => "Translate origin",
            ModeId::ObjectXY => "Object's XY",
            ModeId::ObjectXZ => "Object's XZ",
            ModeId::ObjectYZ => "Object's YZ",
            ModeId::ObjectXYZ => "Object's X Y Z",
            ModeId::ObjectXZY => "Object's X Z Y",
            ModeId::ObjectYZX => "Object's Y Z X",
            ModeId::ObjectYXZ => "Object's Y X Z",
            ModeId::ObjectZXY => "Object's Z X Y",
            ModeId::ObjectZYX => "Object's Z Y X",
            ModeId::ObjectX => "Object's X axis",
            ModeId::ObjectY => "Object's Y axis",
            ModeId::ObjectZ => "Object's Z axis",
            ModeId::ObjectOrigin => "Object's origin",
            ModeId::FlatFace => "Flat face",
            ModeId::TangentPlane => "Tangent to surface",
            ModeId::TangentU => "Tangent to surface (U)",
            ModeId::TangentV => "Tangent to surface (V)",
            ModeId::NormalToEdge => "Normal to edge",
            ModeId::FrenetNB => "Frenet NB",
            ModeId::FrenetTN => "Frenet TN",
            ModeId::FrenetTB => "Frenet TB",
            ModeId::Concentric => "Concentric",
            ModeId::RevolutionSection => "Revolution section",
            ModeId::AxisOfCurvature => "Axis of curvature",
            ModeId::CenterOfCurvature => "Center of curvature",
            ModeId::OnVertex => "Vertex",
            ModeId::OnEdge => "Point on edge",
            ModeId::Focus1 => "First focus",
            ModeId::Focus2 => "Second focus",
            ModeId::Directrix1 => "First directrix",
            ModeId::Directrix2 => "Second directrix",
            ModeId::Asymptote1 => "First asymptote",
            ModeId::Asymptote2 => "Second asymptote",
            ModeId::CenterOfMass => "Center of mass",
            ModeId::TwoPoints => "Through two points",
            ModeId::ThreePointsPlane => "Plane through three points",
            ModeId::ThreePointsNormal => "Normal to three-point plane",
            ModeId::AxisX => "Along X axis",
            ModeId::AxisY => "Along Y axis",
            ModeId::AxisZ => "Along Z axis",
            ModeId::InertialCs => "Inertial CS",
            ModeId::InertiaAxis1 => "Inertia axis 1",
            ModeId::InertiaAxis2 => "Inertia axis 2",
            ModeId::InertiaAxis3 => "Inertia axis 3",
            ModeId::ProximityPoint1 => "Point of proximity 1",
            ModeId::ProximityPoint2 => "Point of proximity 2",
            ModeId::ProximityLine => "Line of proximity",
            ModeId::IntersectionLine => "Intersection of two faces",
            ModeId::IntersectionPoint => "Intersection point",
            ModeId::Folding => "Folding",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}

/// Reference requirements of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefRequirement {
    /// A fixed sequence of slots; each slot lists its acceptable types
    Sequence(&'static [&'static [RefType]]),
    /// Between `min` and `max` references, each of any accepted type
    Multi {
        accepted: &'static [RefType],
        min: usize,
        max: usize,
    },
}

impl RefRequirement {
    /// Minimum number of references
    pub fn min_count(&self) -> usize {
        match self {
            RefRequirement::Sequence(slots) => slots.len(),
            RefRequirement::Multi { min, .. } => *min,
        }
    }

    /// Maximum number of references (excluding an optional indicator vertex)
    pub fn max_count(&self) -> usize {
        match self {
            RefRequirement::Sequence(slots) => slots.len(),
            RefRequirement::Multi { max, .. } => *max,
        }
    }
}

/// How a reference list relates to a mode's requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeMatch {
    /// All required slots are filled with acceptable types
    Full,
    /// A valid prefix; `missing` more references complete it
    Partial { missing: usize },
    /// At least one reference is unacceptable
    No,
}

/// One entry of the attachment mode catalog
#[derive(Debug, Clone, Copy)]
pub struct AttachmentMode {
    pub arity: ArityClass,
    pub id: ModeId,
    pub requirement: RefRequirement,
    /// Whether one extra trailing vertex is accepted as an indicator (it
    /// picks a point on a path or relocates an origin)
    pub optional_vertex: bool,
}

impl AttachmentMode {
    /// The caption shown in pickers and status strings
    pub fn caption(&self) -> &'static str {
        self.id.caption()
    }

    /// Minimum accepted reference count
    pub fn min_refs(&self) -> usize {
        self.requirement.min_count()
    }

    /// Maximum accepted reference count, including the indicator vertex
    pub fn max_refs(&self) -> usize {
        self.requirement.max_count() + usize::from(self.optional_vertex)
    }

    /// Whether `ref_type` is acceptable at position `slot`
    pub fn accepts_slot(&self, slot: usize, ref_type: RefType) -> bool {
        match self.requirement {
            RefRequirement::Sequence(slots) => {
                if slot < slots.len() {
                    slots[slot].contains(&ref_type)
                } else {
                    self.optional_vertex
                        && slot == slots.len()
                        && ref_type == RefType::Vertex
                }
            }
            RefRequirement::Multi { accepted, max, .. } => {
                slot < max && accepted.contains(&ref_type)
            }
        }
    }

    /// Match a reference type list against this mode's requirements
    pub fn match_types(&self, types: &[RefType]) -> ModeMatch {
        if types.len() > self.max_refs() {
            return ModeMatch::No;
        }
        for (slot, ref_type) in types.iter().enumerate() {
            if !self.accepts_slot(slot, *ref_type) {
                return ModeMatch::No;
            }
        }
        let missing = self.min_refs().saturating_sub(types.len());
        if missing == 0 {
            ModeMatch::Full
        } else {
            ModeMatch::Partial { missing }
        }
    }
}

/// A ranked catalog hit for the current reference selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSuggestion {
    pub arity: ArityClass,
    pub id: ModeId,
    /// References still missing for a full match (0 = ready)
    pub missing: usize,
    /// Picker label, e.g. "Through two points (add 1)"
    pub label: String,
}

// Slot type sets
const VERTEX: &[RefType] = &[RefType::Vertex];
const EDGE: &[RefType] = &[RefType::Edge];
const FACE: &[RefType] = &[RefType::Face];
const OBJECT: &[RefType] = &[RefType::Object];
const ANY: &[RefType] = &[RefType::Vertex, RefType::Edge, RefType::Face, RefType::Object];

// Requirements shared across catalog entries
const ONE_VERTEX: RefRequirement = RefRequirement::Sequence(&[VERTEX]);
const TWO_VERTICES: RefRequirement = RefRequirement::Sequence(&[VERTEX, VERTEX]);
const THREE_VERTICES: RefRequirement = RefRequirement::Sequence(&[VERTEX, VERTEX, VERTEX]);
const ONE_EDGE: RefRequirement = RefRequirement::Sequence(&[EDGE]);
const TWO_EDGES: RefRequirement = RefRequirement::Sequence(&[EDGE, EDGE]);
const FOUR_EDGES: RefRequirement = RefRequirement::Sequence(&[EDGE, EDGE, EDGE, EDGE]);
const ONE_FACE: RefRequirement = RefRequirement::Sequence(&[FACE]);
const TWO_FACES: RefRequirement = RefRequirement::Sequence(&[FACE, FACE]);
const FACE_VERTEX: RefRequirement = RefRequirement::Sequence(&[FACE, VERTEX]);
const ONE_OBJECT: RefRequirement = RefRequirement::Sequence(&[OBJECT]);
const TWO_SHAPES: RefRequirement = RefRequirement::Sequence(&[ANY, ANY]);
const MULTI_ANY: RefRequirement = RefRequirement::Multi {
    accepted: ANY,
    min: 1,
    max: 4,
};

/// Read-only catalog of attachment modes
#[derive(Debug)]
pub struct ModeRegistry {
    entries: Vec<AttachmentMode>,
}

impl ModeRegistry {
    /// Build the fixed builtin catalog
    pub fn builtin() -> Self {
        use ArityClass::*;
        use ModeId::*;

        fn mode(
            arity: ArityClass,
            id: ModeId,
            requirement: RefRequirement,
            optional_vertex: bool,
        ) -> AttachmentMode {
            AttachmentMode {
                arity,
                id,
                requirement,
                optional_vertex,
            }
        }

        let entries = vec![
            // Frame
            mode(Frame, Translate, ONE_VERTEX, false),
            mode(Frame, ObjectXY, ONE_OBJECT, true),
            mode(Frame, ObjectXZ, ONE_OBJECT, true),
            mode(Frame, ObjectYZ, ONE_OBJECT, true),
            mode(Frame, ObjectXYZ, ONE_OBJECT, true),
            mode(Frame, ObjectXZY, ONE_OBJECT, true),
            mode(Frame, ObjectYZX, ONE_OBJECT, true),
            mode(Frame, ObjectYXZ, ONE_OBJECT, true),
            mode(Frame, ObjectZXY, ONE_OBJECT, true),
            mode(Frame, ObjectZYX, ONE_OBJECT, true),
            mode(Frame, FlatFace, ONE_FACE, false),
            mode(Frame, TangentPlane, FACE_VERTEX, false),
            mode(Frame, NormalToEdge, ONE_EDGE, true),
            mode(Frame, FrenetNB, ONE_EDGE, true),
            mode(Frame, FrenetTN, ONE_EDGE, true),
            mode(Frame, FrenetTB, ONE_EDGE, true),
            mode(Frame, Concentric, ONE_EDGE, true),
            mode(Frame, RevolutionSection, ONE_EDGE, true),
            mode(Frame, ThreePointsPlane, THREE_VERTICES, false),
            mode(Frame, ThreePointsNormal, THREE_VERTICES, false),
            mode(Frame, Folding, FOUR_EDGES, false),
            mode(Frame, InertialCs, MULTI_ANY, false),
            // Plane
            mode(Plane, FlatFace, ONE_FACE, false),
            mode(Plane, TangentPlane, FACE_VERTEX, false),
            mode(Plane, ObjectXY, ONE_OBJECT, true),
            mode(Plane, ObjectXZ, ONE_OBJECT, true),
            mode(Plane, ObjectYZ, ONE_OBJECT, true),
            mode(Plane, NormalToEdge, ONE_EDGE, true),
            mode(Plane, FrenetNB, ONE_EDGE, true),
            mode(Plane, FrenetTN, ONE_EDGE, true),
            mode(Plane, FrenetTB, ONE_EDGE, true),
            mode(Plane, Concentric, ONE_EDGE, true),
            mode(Plane, RevolutionSection, ONE_EDGE, true),
            mode(Plane, ThreePointsPlane, THREE_VERTICES, false),
            mode(Plane, ThreePointsNormal, THREE_VERTICES, false),
            // Line
            mode(Line, TwoPoints, TWO_VERTICES, false),
            mode(Line, AxisX, ONE_VERTEX, false),
            mode(Line, AxisY, ONE_VERTEX, false),
            mode(Line, AxisZ, ONE_VERTEX, false),
            mode(Line, ObjectX, ONE_OBJECT, true),
            mode(Line, ObjectY, ONE_OBJECT, true),
            mode(Line, ObjectZ, ONE_OBJECT, true),
            mode(Line, AxisOfCurvature, ONE_EDGE, true),
            mode(Line, Directrix1, ONE_EDGE, false),
            mode(Line, Directrix2, ONE_EDGE, false),
            mode(Line, Asymptote1, ONE_EDGE, false),
            mode(Line, Asymptote2, ONE_EDGE, false),
            mode(Line, TangentU, FACE_VERTEX, false),
            mode(Line, TangentV, FACE_VERTEX, false),
            mode(Line, IntersectionLine, TWO_FACES, false),
            mode(Line, ProximityLine, TWO_SHAPES, false),
            mode(Line, InertiaAxis1, MULTI_ANY, false),
            mode(Line, InertiaAxis2, MULTI_ANY, false),
            mode(Line, InertiaAxis3, MULTI_ANY, false),
            // Point
            mode(Point, OnVertex, ONE_VERTEX, false),
            mode(Point, ObjectOrigin, ONE_OBJECT, false),
            mode(Point, Focus1, ONE_EDGE, false),
            mode(Point, Focus2, ONE_EDGE, false),
            mode(Point, OnEdge, ONE_EDGE, true),
            mode(Point, CenterOfCurvature, ONE_EDGE, true),
            mode(Point, CenterOfMass, MULTI_ANY, false),
            mode(Point, IntersectionPoint, TWO_EDGES, false),
            mode(Point, ProximityPoint1, TWO_SHAPES, false),
            mode(Point, ProximityPoint2, TWO_SHAPES, false),
        ];

        Self { entries }
    }

    /// Process-wide shared catalog
    pub fn global() -> &'static ModeRegistry {
        static REGISTRY: OnceLock<ModeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ModeRegistry::builtin)
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty (never, for the builtin catalog)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a catalog entry
    pub fn get(&self, arity: ArityClass, id: ModeId) -> Option<&AttachmentMode> {
        self.entries
            .iter()
            .find(|m| m.arity == arity && m.id == id)
    }

    /// All modes of one arity class, in catalog order
    pub fn modes_for(&self, arity: ArityClass) -> Vec<&AttachmentMode> {
        self.entries.iter().filter(|m| m.arity == arity).collect()
    }

    /// Modes of `arity` compatible with the given reference types, ranked:
    /// full matches first, then by how many references are still missing.
    pub fn compatible_modes(&self, arity: ArityClass, types: &[RefType]) -> Vec<ModeSuggestion> {
        let mut suggestions: Vec<ModeSuggestion> = self
            .entries
            .iter()
            .filter(|m| m.arity == arity)
            .filter_map(|m| match m.match_types(types) {
                ModeMatch::Full => Some(ModeSuggestion {
                    arity: m.arity,
                    id: m.id,
                    missing: 0,
                    label: m.caption().to_string(),
                }),
                ModeMatch::Partial { missing } => {
                    let label = match m.requirement {
                        RefRequirement::Sequence(_) => {
                            format!("{} (add {})", m.caption(), missing)
                        }
                        RefRequirement::Multi { .. } => {
                            format!("{} (add more references)", m.caption())
                        }
                    };
                    Some(ModeSuggestion {
                        arity: m.arity,
                        id: m.id,
                        missing,
                        label,
                    })
                }
                ModeMatch::No => None,
            })
            .collect();
        suggestions.sort_by_key(|s| s.missing);
        suggestions
    }
}
