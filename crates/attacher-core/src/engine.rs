//! Attachment controller
//!
//! Owns the mode, references, offset and flip state of one placed feature
//! and recomputes its placement synchronously on every input change. A
//! failed resolution never touches the previously published placement.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AttachError, AttachResult};
use crate::geometry::GeometrySource;
use crate::mode::{ArityClass, ModeId, ModeRegistry, ModeSuggestion};
use crate::offset::{AttachOffset, compose};
use crate::placement::Placement;
use crate::reference::Reference;
use crate::resolver;
use crate::solver::{self, SolveInput};

/// Controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttachState {
    /// No mode chosen; the stored placement is left untouched
    Unattached,
    /// Mode chosen, no references supplied yet
    ModeSelected,
    /// Validation passed; solving is underway
    ReferencesValid,
    /// Solved; the placement has been published
    Resolved,
    /// Validation or solving failed; the previous placement is retained
    Failed(AttachError),
}

/// The attachment engine of one feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentEngine {
    /// The feature being placed (used for self-reference and cycle checks)
    feature: Uuid,
    mode: Option<(ArityClass, ModeId)>,
    references: Vec<Reference>,
    offset: AttachOffset,
    flip: bool,
    /// Normalized path parameter for curve-based modes
    parameter: f32,
    state: AttachState,
    /// Last published placement; survives failed recomputes unchanged
    placement: Placement,
}

impl AttachmentEngine {
    /// Create an unattached engine for `feature`
    pub fn new(feature: Uuid) -> Self {
        Self::with_placement(feature, Placement::IDENTITY)
    }

    /// Create an unattached engine that starts from an existing placement
    pub fn with_placement(feature: Uuid, placement: Placement) -> Self {
        Self {
            feature,
            mode: None,
            references: Vec::new(),
            offset: AttachOffset::IDENTITY,
            flip: false,
            parameter: 0.0,
            state: AttachState::Unattached,
            placement,
        }
    }

    /// The feature this engine places
    pub fn feature(&self) -> Uuid {
        self.feature
    }

    /// Current controller state
    pub fn state(&self) -> &AttachState {
        &self.state
    }

    /// The last published placement
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The selected mode, if any
    pub fn mode(&self) -> Option<(ArityClass, ModeId)> {
        self.mode
    }

    /// Current reference list
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Current offset
    pub fn offset(&self) -> AttachOffset {
        self.offset
    }

    /// Current flip flag
    pub fn flip(&self) -> bool {
        self.flip
    }

    /// Current path parameter
    pub fn parameter(&self) -> f32 {
        self.parameter
    }

    /// Select a mode and recompute
    pub fn set_mode(
        &mut self,
        arity: ArityClass,
        id: ModeId,
        source: &dyn GeometrySource,
    ) -> &AttachState {
        self.mode = Some((arity, id));
        self.recompute(source)
    }

    /// Deactivate attachment; the stored placement stays as it is
    pub fn clear_mode(&mut self) -> &AttachState {
        self.mode = None;
        self.state = AttachState::Unattached;
        &self.state
    }

    /// Replace the reference list and recompute
    pub fn set_references(
        &mut self,
        references: Vec<Reference>,
        source: &dyn GeometrySource,
    ) -> &AttachState {
        self.references = references;
        self.recompute(source)
    }

    /// Change the offset and recompute
    pub fn set_offset(&mut self, offset: AttachOffset, source: &dyn GeometrySource) -> &AttachState {
        self.offset = offset;
        self.recompute(source)
    }

    /// Change the flip flag and recompute
    pub fn set_flip(&mut self, flip: bool, source: &dyn GeometrySource) -> &AttachState {
        self.flip = flip;
        self.recompute(source)
    }

    /// Change the path parameter and recompute
    pub fn set_parameter(&mut self, parameter: f32, source: &dyn GeometrySource) -> &AttachState {
        self.parameter = parameter.clamp(0.0, 1.0);
        self.recompute(source)
    }

    /// Re-run the pipeline after a referenced object's geometry changed
    pub fn notify_geometry_changed(&mut self, source: &dyn GeometrySource) -> &AttachState {
        self.recompute(source)
    }

    /// Validate, solve and compose synchronously.
    ///
    /// Publishes a new placement on success; on failure the previous
    /// placement is retained and the error lands in the state.
    pub fn recompute(&mut self, source: &dyn GeometrySource) -> &AttachState {
        let Some((arity, id)) = self.mode else {
            self.state = AttachState::Unattached;
            return &self.state;
        };

        self.state = AttachState::ModeSelected;
        if self.references.is_empty() {
            return &self.state;
        }

        match self.resolve(arity, id, source) {
            Ok(placement) => {
                tracing::debug!("feature {} attached with mode {}", self.feature, id);
                self.placement = placement;
                self.state = AttachState::Resolved;
            }
            Err(error) => {
                tracing::warn!(
                    "feature {} attachment failed: {}; retaining previous placement",
                    self.feature,
                    error
                );
                self.state = AttachState::Failed(error);
            }
        }
        &self.state
    }

    fn resolve(
        &mut self,
        arity: ArityClass,
        id: ModeId,
        source: &dyn GeometrySource,
    ) -> AttachResult<Placement> {
        let mode = ModeRegistry::global()
            .get(arity, id)
            .ok_or(AttachError::Unknown)?;
        let validated = resolver::validate(self.feature, &self.references, mode, source)?;
        self.state = AttachState::ReferencesValid;
        let input = SolveInput {
            parameter: self.parameter,
        };
        let base = solver::solve(id, &validated, &input)?;
        Ok(compose(base, arity, self.flip, &self.offset))
    }

    /// Whether the current failure requires changing references before a
    /// re-attempt can succeed.
    pub fn is_permanent_failure(&self) -> bool {
        matches!(&self.state, AttachState::Failed(e) if e.is_permanent())
    }

    /// Human-readable status for UI and report surfaces
    pub fn status_text(&self) -> String {
        match &self.state {
            AttachState::Unattached
            | AttachState::ModeSelected
            | AttachState::ReferencesValid => "Not attached".to_string(),
            AttachState::Resolved => match self.mode {
                Some((_, id)) => format!("Attached with mode {}", id),
                None => "Not attached".to_string(),
            },
            AttachState::Failed(error) => format!("Attachment mode failed: {}", error),
        }
    }

    /// Modes of `arity` compatible with the current reference selection,
    /// ranked; references whose geometry cannot be resolved are ignored.
    pub fn compatible_modes(
        &self,
        arity: ArityClass,
        source: &dyn GeometrySource,
    ) -> Vec<ModeSuggestion> {
        let types: Vec<_> = self
            .references
            .iter()
            .filter_map(|r| source.lookup(r).map(|g| g.ref_type()))
            .collect();
        ModeRegistry::global().compatible_modes(arity, &types)
    }
}
