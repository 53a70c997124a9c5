//! Parametric-point family
//!
//! Points at path parameters, conic foci and directrices, hyperbola
//! asymptotes, and the center of mass of one or more references.

use crate::error::AttachResult;
use crate::geometry::MassProperties;
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{SolveInput, edge_at, edge_parameter, kernel_err, line_frame, vertex_at};

pub(super) fn solve(
    id: ModeId,
    refs: &ValidatedReferences,
    input: &SolveInput,
) -> AttachResult<Placement> {
    match id {
        ModeId::OnVertex => {
            let position = vertex_at(refs, 0)?;
            Ok(Placement::from_translation(position))
        }
        ModeId::OnEdge => {
            let edge = edge_at(refs, 0)?;
            let t = edge_parameter(edge, refs, input);
            Ok(Placement::from_translation(edge.curve.point_at(t)))
        }
        ModeId::Focus1 | ModeId::Focus2 => {
            let edge = edge_at(refs, 0)?;
            let (first, second) = edge.curve.foci().ok_or_else(|| {
                kernel_err(format!("{} has no focus", edge.curve.kind_name()))
            })?;
            let focus = if id == ModeId::Focus1 {
                first
            } else {
                second.ok_or_else(|| {
                    kernel_err(format!("{} has a single focus", edge.curve.kind_name()))
                })?
            };
            Ok(Placement::from_translation(focus))
        }
        ModeId::Directrix1 | ModeId::Directrix2 => {
            let edge = edge_at(refs, 0)?;
            let (first, second) = edge.curve.directrices().ok_or_else(|| {
                kernel_err(format!("{} has no directrix", edge.curve.kind_name()))
            })?;
            let (origin, dir) = if id == ModeId::Directrix1 {
                first
            } else {
                second.ok_or_else(|| {
                    kernel_err(format!("{} has a single directrix", edge.curve.kind_name()))
                })?
            };
            line_frame(origin, dir)
        }
        ModeId::Asymptote1 | ModeId::Asymptote2 => {
            let edge = edge_at(refs, 0)?;
            let [first, second] = edge.curve.asymptotes().ok_or_else(|| {
                kernel_err(format!("{} has no asymptotes", edge.curve.kind_name()))
            })?;
            let (origin, dir) = if id == ModeId::Asymptote1 { first } else { second };
            line_frame(origin, dir)
        }
        ModeId::CenterOfMass => {
            let props: Vec<MassProperties> = refs.iter().map(|r| r.geometry.props()).collect();
            let combined = MassProperties::combine(&props)
                .ok_or_else(|| kernel_err("references have zero total measure"))?;
            Ok(Placement::from_translation(combined.centroid))
        }
        _ => Err(crate::error::AttachError::Unknown),
    }
}
