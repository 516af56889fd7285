//! Joint pinning and knee-driven leg coupling.

use std::collections::HashMap;

use ergokin_core::error::PostureError;
use ergokin_core::layout::JointLayout;
use ergokin_core::traits::SkeletonModel;
use ergokin_core::types::Side;

/// One leg's coupling indices into the joint vector.
#[derive(Debug, Clone, Copy)]
struct LegIndices {
    knee: usize,
    hip: usize,
    ankle: usize,
}

/// Resolved constraint set for one optimization call.
///
/// Joint names are resolved to indices at build time; [`Self::apply`] is
/// index-only and runs on every cost evaluation.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pins: Vec<(usize, f64)>,
    legs: [LegIndices; 2],
}

impl ConstraintSet {
    /// Resolve a pin map and both legs' coupling joints against the layout.
    ///
    /// # Errors
    ///
    /// [`PostureError::UnknownJoint`] if a pin name or a coupling joint
    /// (`{side}_knee`, `{side}_hip_1`, `{side}_ankle_1`) is missing from the
    /// model's ordering.
    pub fn new(layout: &JointLayout, pins: &HashMap<String, f64>) -> Result<Self, PostureError> {
        let mut resolved = pins
            .iter()
            .map(|(name, &value)| Ok((layout.index(name)?, value)))
            .collect::<Result<Vec<_>, PostureError>>()?;
        // HashMap iteration order is arbitrary; keep application deterministic.
        resolved.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let leg = |side: Side| -> Result<LegIndices, PostureError> {
            let prefix = side.prefix();
            Ok(LegIndices {
                knee: layout.index(&format!("{prefix}_knee"))?,
                hip: layout.index(&format!("{prefix}_hip_1"))?,
                ankle: layout.index(&format!("{prefix}_ankle_1"))?,
            })
        };
        Ok(Self {
            pins: resolved,
            legs: [leg(Side::Left)?, leg(Side::Right)?],
        })
    }

    /// Enforce pins, then leg coupling, in place.
    ///
    /// Pins run first: a pin on a coupled hip/ankle axis is overwritten by
    /// the coupling step. Each leg's hip_1 AND ankle_1 both take the derived
    /// hip angle; the derived ankle angle is discarded (observed upstream
    /// contract, pinned by test).
    pub fn apply<M: SkeletonModel + ?Sized>(&self, q: &mut [f64], model: &M) {
        for &(index, value) in &self.pins {
            q[index] = value;
        }
        for leg in &self.legs {
            let (hip, _ankle) = model.leg_joints(q[leg.knee]);
            q[leg.hip] = hip;
            q[leg.ankle] = hip;
        }
    }

    /// Constrained copy of a candidate point.
    pub fn constrained<M: SkeletonModel + ?Sized>(&self, q: &[f64], model: &M) -> Vec<f64> {
        let mut out = q.to_vec();
        self.apply(&mut out, model);
        out
    }
}
