//! Proximity family
//!
//! Nearest point (or connecting line) between two independent reference
//! shapes.

use crate::error::AttachResult;
use crate::geometry::closest_points;
use crate::mode::ModeId;
use crate::placement::Placement;
use crate::resolver::ValidatedReferences;

use super::{kernel_err, line_frame};

pub(super) fn solve(id: ModeId, refs: &ValidatedReferences) -> AttachResult<Placement> {
    let a = refs
        .geometry(0)
        .ok_or(crate::error::AttachError::Unknown)?;
    let b = refs
        .geometry(1)
        .ok_or(crate::error::AttachError::Unknown)?;
    let (pa, pb) = closest_points(a, b);

    match id {
        ModeId::ProximityPoint1 => Ok(Placement::from_translation(pa)),
        ModeId::ProximityPoint2 => Ok(Placement::from_translation(pb)),
        ModeId::ProximityLine => {
            if (pb - pa).length_squared() < 1e-12 {
                return Err(kernel_err("shapes touch; proximity line is undefined"));
            }
            line_frame(pa, pb - pa)
        }
        _ => Err(crate::error::AttachError::Unknown),
    }
}
