//! Attachment error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::RefType;

/// Errors produced while validating references or solving a placement
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AttachError {
    #[error("insufficient references: mode needs {needed}, got {got}")]
    InsufficientReferences { needed: usize, got: usize },

    #[error("reference {index} has wrong type ({found})")]
    WrongReferenceType { index: usize, found: RefType },

    #[error("feature references itself")]
    SelfReference,

    #[error("reference depends on the feature being placed")]
    CyclicDependency,

    #[error("geometry kernel error: {0}")]
    GeometryKernel(String),

    #[error("mode is not implemented")]
    NotImplemented,

    #[error("unknown error")]
    Unknown,
}

impl AttachError {
    /// Permanent rejections require the user to change references before
    /// re-attempting; everything else is re-evaluated on the next input change.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AttachError::SelfReference | AttachError::CyclicDependency
        )
    }
}

/// Result type for attachment operations
pub type AttachResult<T> = Result<T, AttachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanence() {
        assert!(AttachError::SelfReference.is_permanent());
        assert!(AttachError::CyclicDependency.is_permanent());
        assert!(!AttachError::NotImplemented.is_permanent());
        assert!(
            !AttachError::InsufficientReferences { needed: 2, got: 1 }.is_permanent()
        );
        assert!(!AttachError::GeometryKernel("degenerate".into()).is_permanent());
    }

    #[test]
    fn test_display_forms() {
        let err = AttachError::InsufficientReferences { needed: 3, got: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient references: mode needs 3, got 1"
        );
        assert_eq!(
            AttachError::NotImplemented.to_string(),
            "mode is not implemented"
        );
    }
}
