//! Weighted multi-term posture cost.

use std::collections::HashMap;

use ergokin_core::error::PostureError;
use ergokin_core::geometry::frame_deviation_cost;
use ergokin_core::layout::{active_joint_names, JointLayout};
use ergokin_core::traits::{ErgonomicModel, SkeletonModel};
use ergokin_core::types::{CostWeights, FixedFrame, FrameCoeffs, Pose, SafetyZone, Side};

use crate::constraints::ConstraintSet;

/// Where a fixed frame lives in the per-side chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainPos {
    EndEffector,
    Joint(usize),
}

/// A fixed-frame target with its names resolved against the chains.
#[derive(Debug, Clone)]
struct FrameTarget {
    side: usize,
    pos: ChainPos,
    reference: Option<(usize, ChainPos)>,
    coeffs: FrameCoeffs,
    desired: Pose,
}

/// Scan order: per side (left first), end-effector name before active-joint
/// names. First match wins.
fn resolve_target<M: SkeletonModel>(
    model: &M,
    name: &str,
) -> Result<(usize, ChainPos), PostureError> {
    let end_effectors = model.end_effectors();
    for side in Side::BOTH {
        let s = side.index();
        if end_effectors.get(s).is_some_and(|ee| ee == name) {
            return Ok((s, ChainPos::EndEffector));
        }
        if let Some(i) = active_joint_names(side).iter().position(|n| n == name) {
            return Ok((s, ChainPos::Joint(i)));
        }
    }
    Err(PostureError::UnresolvedFrame(name.to_owned()))
}

/// Scalar posture objective for one optimization call.
///
/// Built once per call: active-joint indices, fixed-frame targets, and the
/// term flags derived from the weights are all resolved up front, leaving
/// [`Self::evaluate`] infallible and allocation-light.
///
/// Terms with a zero weight are never computed; in particular forward
/// kinematics runs only when the safety or fixed-frame term needs it, and
/// then exactly once per evaluation.
#[derive(Debug)]
pub struct CostEvaluator<'a, M: SkeletonModel, R: ErgonomicModel> {
    model: &'a M,
    reba: &'a R,
    layout: &'a JointLayout,
    weights: CostWeights,
    zone: SafetyZone,
    side: Side,
    active: Vec<usize>,
    frames: Vec<FrameTarget>,
    constraints: ConstraintSet,
    needs_reba: bool,
    needs_safety: bool,
    needs_frames: bool,
}

impl<'a, M: SkeletonModel, R: ErgonomicModel> CostEvaluator<'a, M, R> {
    /// Build an evaluator, resolving every referenced name.
    ///
    /// # Errors
    ///
    /// [`PostureError::UnknownJoint`] if an active-chain joint is missing
    /// from the model; [`PostureError::UnresolvedFrame`] if a fixed-frame
    /// key (or reference frame) matches neither an end-effector nor an
    /// active joint on either side. Frames are only resolved when the
    /// fixed-frame term is live.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: &'a M,
        reba: &'a R,
        layout: &'a JointLayout,
        side: Side,
        weights: CostWeights,
        zone: SafetyZone,
        constraints: ConstraintSet,
        fixed_frames: &HashMap<String, FixedFrame>,
    ) -> Result<Self, PostureError> {
        let needs_reba = weights.reba != 0.0;
        let needs_safety = weights.safety != 0.0;
        let needs_frames = weights.fixed_frame != 0.0 && !fixed_frames.is_empty();

        let active = layout.active_indices(side)?;
        let mut frames = Vec::new();
        if needs_frames {
            frames.reserve(fixed_frames.len());
            for (name, frame) in fixed_frames {
                let (frame_side, pos) = resolve_target(model, name)?;
                let reference = frame
                    .reference_frame
                    .as_deref()
                    .map(|r| resolve_target(model, r))
                    .transpose()?;
                frames.push(FrameTarget {
                    side: frame_side,
                    pos,
                    reference,
                    coeffs: frame.coeffs,
                    desired: frame.desired_pose,
                });
            }
        }

        Ok(Self {
            model,
            reba,
            layout,
            weights,
            zone,
            side,
            active,
            frames,
            constraints,
            needs_reba,
            needs_safety,
            needs_frames,
        })
    }

    fn lookup<'c>(chains: &'c [Vec<Pose>; 2], side: usize, pos: ChainPos) -> &'c Pose {
        let chain = &chains[side];
        match pos {
            ChainPos::EndEffector => &chain[chain.len() - 1],
            ChainPos::Joint(i) => &chain[i],
        }
    }

    fn frame_cost(&self, target: &FrameTarget, chains: &[Vec<Pose>; 2]) -> f64 {
        let pose = Self::lookup(chains, target.side, target.pos);
        let resolved: Pose = match target.reference {
            Some((ref_side, ref_pos)) => Self::lookup(chains, ref_side, ref_pos).inverse() * pose,
            None => *pose,
        };
        frame_deviation_cost(&resolved, &target.desired, target.coeffs)
    }

    /// Weighted total cost of a candidate point.
    ///
    /// The candidate is copied and constrained before any term is computed;
    /// the caller's slice is never mutated.
    pub fn evaluate(&self, q: &[f64]) -> f64 {
        let joints = self.constraints.constrained(q, self.model);

        let mut safety = 0.0;
        let mut frame = 0.0;
        if self.needs_safety || self.needs_frames {
            let active: Vec<f64> = self.active.iter().map(|&i| joints[i]).collect();
            let chains = self.model.forward_kinematics(&active);
            if self.needs_safety {
                let ee = Self::lookup(&chains, self.side.index(), ChainPos::EndEffector);
                safety = self.zone.violation(&ee.translation.vector);
            }
            if self.needs_frames {
                for target in &self.frames {
                    frame += self.frame_cost(target, &chains);
                }
            }
        }

        let reba = if self.needs_reba {
            let features = self
                .reba
                .features_from_joints(&joints, self.layout.names());
            self.reba.assess(&features)
        } else {
            0.0
        };

        self.weights.reba * reba + self.weights.safety * safety + self.weights.fixed_frame * frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ergokin_test_utils::{CountingReba, StickFigureModel};

    fn evaluator<'a>(
        model: &'a StickFigureModel,
        reba: &'a CountingReba,
        layout: &'a JointLayout,
        weights: CostWeights,
        zone: SafetyZone,
        frames: &HashMap<String, FixedFrame>,
    ) -> CostEvaluator<'a, StickFigureModel, CountingReba> {
        let constraints = ConstraintSet::new(layout, &HashMap::new()).unwrap();
        CostEvaluator::new(model, reba, layout, Side::Left, weights, zone, constraints, frames)
            .unwrap()
    }

    fn rest(layout: &JointLayout) -> Vec<f64> {
        vec![0.0; layout.len()]
    }

    #[test]
    fn reba_only_skips_forward_kinematics() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(1.0, 0.0, 0.0),
            SafetyZone::default(),
            &HashMap::new(),
        );
        eval.evaluate(&rest(&layout));
        assert_eq!(model.fk_calls(), 0);
        assert_eq!(reba.conversions(), 1);
    }

    #[test]
    fn safety_only_skips_assessment() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 1.0, 0.0),
            SafetyZone::default(),
            &HashMap::new(),
        );
        eval.evaluate(&rest(&layout));
        assert_eq!(model.fk_calls(), 1);
        assert_eq!(reba.conversions(), 0);
    }

    #[test]
    fn frame_weight_without_frames_skips_forward_kinematics() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 0.0, 1.0),
            SafetyZone::default(),
            &HashMap::new(),
        );
        assert_eq!(eval.evaluate(&rest(&layout)), 0.0);
        assert_eq!(model.fk_calls(), 0);
    }

    #[test]
    fn forward_kinematics_runs_once_for_both_geometric_terms() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let desired = model.forward_kinematics(&[0.0; StickFigureModel::ACTIVE_DOF])[0][10];
        let mut frames = HashMap::new();
        frames.insert(
            "left_hand".to_owned(),
            FixedFrame {
                coeffs: FrameCoeffs::new(1.0, 1.0),
                desired_pose: desired,
                reference_frame: None,
            },
        );
        let fk_before = model.fk_calls();
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 1.0, 1.0),
            SafetyZone::default(),
            &frames,
        );
        eval.evaluate(&rest(&layout));
        assert_eq!(model.fk_calls() - fk_before, 1);
    }

    #[test]
    fn safety_cost_zero_inside_zone() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 1.0, 0.0),
            SafetyZone::new((0.0, 2.0), (-1.0, 1.0), (-1.0, 1.0)),
            &HashMap::new(),
        );
        assert_eq!(eval.evaluate(&rest(&layout)), 0.0);
    }

    #[test]
    fn safety_cost_exact_low_bound_overshoot() {
        // Resting end-effector x = 1.1 sits 0.2 below the zone's low bound.
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 1.0, 0.0),
            SafetyZone::new((1.3, 2.0), (-1.0, 1.0), (-1.0, 1.0)),
            &HashMap::new(),
        );
        assert_relative_eq!(eval.evaluate(&rest(&layout)), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn fixed_frame_cost_zero_at_desired_pose() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let desired = *model.forward_kinematics(&[0.0; StickFigureModel::ACTIVE_DOF])[0]
            .last()
            .unwrap();
        let mut frames = HashMap::new();
        frames.insert(
            "left_hand".to_owned(),
            FixedFrame {
                coeffs: FrameCoeffs::new(1.0, 1.0),
                desired_pose: desired,
                reference_frame: None,
            },
        );
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 0.0, 1.0),
            SafetyZone::default(),
            &frames,
        );
        assert_relative_eq!(eval.evaluate(&rest(&layout)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_frame_cost_position_offset() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let mut desired = *model.forward_kinematics(&[0.0; StickFigureModel::ACTIVE_DOF])[0]
            .last()
            .unwrap();
        desired.translation.vector.y += 0.3;
        let mut frames = HashMap::new();
        frames.insert(
            "left_hand".to_owned(),
            FixedFrame {
                coeffs: FrameCoeffs::new(1.0, 0.0),
                desired_pose: desired,
                reference_frame: None,
            },
        );
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 0.0, 1.0),
            SafetyZone::default(),
            &frames,
        );
        assert_relative_eq!(eval.evaluate(&rest(&layout)), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn fixed_frame_relative_to_reference() {
        // The wrist expressed in its own side's spine_0 frame: desired is
        // the composed relative pose at rest, so the cost is zero at rest.
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let chains = model.forward_kinematics(&[0.0; StickFigureModel::ACTIVE_DOF]);
        let desired = chains[0][0].inverse() * chains[0][9];
        let mut frames = HashMap::new();
        frames.insert(
            "left_wrist_1".to_owned(),
            FixedFrame {
                coeffs: FrameCoeffs::new(1.0, 1.0),
                desired_pose: desired,
                reference_frame: Some("spine_0".to_owned()),
            },
        );
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(0.0, 0.0, 1.0),
            SafetyZone::default(),
            &frames,
        );
        assert_relative_eq!(eval.evaluate(&rest(&layout)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn unresolved_frame_fails_at_build() {
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let constraints = ConstraintSet::new(&layout, &HashMap::new()).unwrap();
        let mut frames = HashMap::new();
        frames.insert(
            "left_foot".to_owned(),
            FixedFrame {
                coeffs: FrameCoeffs::new(1.0, 0.0),
                desired_pose: Pose::identity(),
                reference_frame: None,
            },
        );
        let err = CostEvaluator::new(
            &model,
            &reba,
            &layout,
            Side::Left,
            CostWeights::new(0.0, 0.0, 1.0),
            SafetyZone::default(),
            constraints,
            &frames,
        )
        .unwrap_err();
        assert!(matches!(err, PostureError::UnresolvedFrame(name) if name == "left_foot"));
    }

    #[test]
    fn right_side_frame_resolves_to_second_chain() {
        let model = StickFigureModel::new();
        assert_eq!(
            resolve_target(&model, "right_hand").unwrap(),
            (1, ChainPos::EndEffector)
        );
        assert_eq!(
            resolve_target(&model, "right_shoulder_0").unwrap(),
            (1, ChainPos::Joint(3))
        );
        // Shared spine joints resolve to the left chain first.
        assert_eq!(
            resolve_target(&model, "spine_2").unwrap(),
            (0, ChainPos::Joint(2))
        );
    }

    #[test]
    fn reba_term_scores_constrained_joints() {
        // The knee drives hip_1/ankle_1 through coupling before assessment.
        let model = StickFigureModel::new();
        let reba = CountingReba::new();
        let layout = JointLayout::new(model.joint_names());
        let eval = evaluator(
            &model,
            &reba,
            &layout,
            CostWeights::new(1.0, 0.0, 0.0),
            SafetyZone::default(),
            &HashMap::new(),
        );
        let mut q = rest(&layout);
        q[layout.index("left_knee").unwrap()] = 0.8;
        // |knee| + |hip_1| + |ankle_1| = 0.8 + 0.4 + 0.4
        assert_relative_eq!(eval.evaluate(&q), 1.6, epsilon = 1e-12);
    }
}
