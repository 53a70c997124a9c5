//! Reference addresses for attachment inputs

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of element a reference resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefType {
    Vertex,
    Edge,
    Face,
    Object,
}

impl RefType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RefType::Vertex => "Vertex",
            RefType::Edge => "Edge",
            RefType::Face => "Face",
            RefType::Object => "Object",
        }
    }

    /// All reference types
    pub fn all() -> &'static [RefType] {
        &[RefType::Vertex, RefType::Edge, RefType::Face, RefType::Object]
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A stable address for a geometric reference: the owning object plus an
/// optional sub-element name ("Vertex3", "Edge1", ...).
///
/// A reference without an element name addresses the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Owning object ID
    pub object: Uuid,
    /// Sub-element name within the object, if any
    pub element: Option<String>,
}

impl Reference {
    /// Reference a whole object
    pub fn object(object: Uuid) -> Self {
        Self {
            object,
            element: None,
        }
    }

    /// Reference a named sub-element of an object
    pub fn element(object: Uuid, name: impl Into<String>) -> Self {
        Self {
            object,
            element: Some(name.into()),
        }
    }

    /// Check if this reference addresses the whole object
    pub fn is_whole_object(&self) -> bool {
        self.element.is_none()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(name) => write!(f, "{}:{}", self.object, name),
            None => write!(f, "{}", self.object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_object() {
        let id = Uuid::new_v4();
        assert!(Reference::object(id).is_whole_object());
        assert!(!Reference::element(id, "Edge1").is_whole_object());
    }

    #[test]
    fn test_display() {
        let id = Uuid::new_v4();
        let r = Reference::element(id, "Vertex2");
        assert_eq!(r.to_string(), format!("{}:Vertex2", id));
    }
}
