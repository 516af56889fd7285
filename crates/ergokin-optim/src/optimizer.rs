//! Posture optimization driver.
//!
//! Wires the constraint set, the cost evaluator, and the bounded minimizer
//! together for one optimization call, and repairs the raw solver output so
//! pinned joints hold their exact values.

use std::collections::HashMap;

use log::debug;

use ergokin_core::config::OptimizationConfig;
use ergokin_core::error::PostureError;
use ergokin_core::layout::JointLayout;
use ergokin_core::traits::{BoundedMinimizer, ErgonomicModel, SkeletonModel};
use ergokin_core::types::{FixedFrame, JointVector, Side};

use crate::constraints::ConstraintSet;
use crate::cost::CostEvaluator;

/// Result of one posture optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureOutcome {
    /// Optimized joint vector, with constraints exactly enforced.
    pub joints: JointVector,
    /// The minimizer's convergence status, unmodified. Non-convergence is
    /// not retried; the caller inspects this and decides.
    pub converged: bool,
    /// Minimizer iterations used.
    pub iterations: u32,
    /// Final objective value.
    pub cost: f64,
}

/// Drives the bounded minimizer over the posture cost.
pub struct PostureOptimizer<'a, M, R, S> {
    model: &'a M,
    reba: &'a R,
    solver: S,
    config: OptimizationConfig,
    layout: JointLayout,
}

impl<'a, M: SkeletonModel, R: ErgonomicModel, S: BoundedMinimizer> PostureOptimizer<'a, M, R, S> {
    /// Build an optimizer over a model, an assessment backend, and a solver.
    ///
    /// # Errors
    ///
    /// [`PostureError::Config`] if the configuration fails validation.
    pub fn new(
        model: &'a M,
        reba: &'a R,
        solver: S,
        config: OptimizationConfig,
    ) -> Result<Self, PostureError> {
        config.validate()?;
        let layout = JointLayout::new(model.joint_names());
        Ok(Self {
            model,
            reba,
            solver,
            config,
            layout,
        })
    }

    /// Canonical joint layout built from the model.
    pub fn layout(&self) -> &JointLayout {
        &self.layout
    }

    /// Optimize a posture from `initial`, honoring fixed joints and frames.
    ///
    /// Caller-supplied `fixed_joints` override the configured default pins;
    /// coupled hip/ankle axes are driven by the knee regardless of pins.
    /// The returned joints satisfy every constraint exactly, even when the
    /// minimizer's raw output carries finite-difference residue.
    ///
    /// # Errors
    ///
    /// [`PostureError::JointDimMismatch`] if `initial` or the model's limits
    /// table disagrees with the joint count; [`PostureError::UnknownJoint`] /
    /// [`PostureError::UnresolvedFrame`] if a referenced name does not
    /// resolve. All of these surface before the minimizer runs.
    pub fn optimize(
        &self,
        initial: &JointVector,
        side: Side,
        fixed_joints: &HashMap<String, f64>,
        fixed_frames: &HashMap<String, FixedFrame>,
    ) -> Result<PostureOutcome, PostureError> {
        if initial.len() != self.layout.len() {
            return Err(PostureError::JointDimMismatch {
                expected: self.layout.len(),
                got: initial.len(),
            });
        }

        let pins = self.config.merged_pins(fixed_joints);
        let constraints = ConstraintSet::new(&self.layout, &pins)?;
        let evaluator = CostEvaluator::new(
            self.model,
            self.reba,
            &self.layout,
            side,
            self.config.weights,
            self.config.safety_zone,
            constraints.clone(),
            fixed_frames,
        )?;

        let bounds = self.model.joint_limits();
        if bounds.len() != self.layout.len() {
            return Err(PostureError::JointDimMismatch {
                expected: self.layout.len(),
                got: bounds.len(),
            });
        }

        debug!(
            "optimizing posture: side={side:?}, pins={}, frames={}",
            pins.len(),
            fixed_frames.len()
        );

        let outcome = self.solver.minimize(
            |q| evaluator.evaluate(q),
            initial.as_slice(),
            &bounds,
            self.config.variation_step,
        );

        // The solver's last internal step may leave finite-difference
        // residue on pinned axes; repair to the exact constrained values.
        let mut joints = outcome.x;
        constraints.apply(&mut joints, self.model);

        debug!(
            "posture optimization finished: converged={}, iterations={}, cost={}",
            outcome.converged, outcome.iterations, outcome.cost
        );

        Ok(PostureOutcome {
            joints: JointVector::new(joints),
            converged: outcome.converged,
            iterations: outcome.iterations,
            cost: outcome.cost,
        })
    }
}
