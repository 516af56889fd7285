//! Contracts of the external collaborators the posture engine depends on.

use crate::types::Pose;

// ---------------------------------------------------------------------------
// SkeletonModel
// ---------------------------------------------------------------------------

/// Kinematic model of the tracked human skeleton.
///
/// The model owns the canonical joint ordering and the forward-kinematic
/// chain evaluation; the engine treats both as opaque.
pub trait SkeletonModel: Send + Sync {
    /// Canonical joint names. Ordering is stable for the model's lifetime
    /// and indexes every [`JointVector`](crate::types::JointVector).
    fn joint_names(&self) -> &[String];

    /// Per-joint `(min, max)` bounds, ordered per [`Self::joint_names`].
    fn joint_limits(&self) -> Vec<(f64, f64)>;

    /// End-effector frame name of each side's chain, in side order.
    fn end_effectors(&self) -> &[String];

    /// Per-side kinematic chains for the given active-joint values.
    ///
    /// Each chain holds one pose per active joint, in chain order; the last
    /// pose of a chain is that side's end-effector.
    fn forward_kinematics(&self, active: &[f64]) -> [Vec<Pose>; 2];

    /// Coupled `(hip, ankle)` angles for a knee angle.
    fn leg_joints(&self, knee: f64) -> (f64, f64);
}

// ---------------------------------------------------------------------------
// ErgonomicModel
// ---------------------------------------------------------------------------

/// Ergonomic risk assessment backend (REBA or equivalent).
pub trait ErgonomicModel: Send + Sync {
    /// Assessment-domain feature representation of a posture.
    type Features;

    /// Convert a full joint vector into assessment features.
    fn features_from_joints(&self, joints: &[f64], joint_names: &[String]) -> Self::Features;

    /// Scalar risk score of a feature vector. Lower is safer.
    fn assess(&self, features: &Self::Features) -> f64;
}

// ---------------------------------------------------------------------------
// BoundedMinimizer
// ---------------------------------------------------------------------------

/// Result of a bounded minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    /// Locally optimal point.
    pub x: Vec<f64>,
    /// Whether the solver met its convergence criteria. Non-convergence is
    /// a status, not an error; the caller decides what to do with it.
    pub converged: bool,
    /// Iterations used.
    pub iterations: u32,
    /// Objective value at `x`.
    pub cost: f64,
}

/// A bounded local minimizer over a scalar objective.
pub trait BoundedMinimizer {
    /// Minimize `objective` starting from `x0`, keeping every coordinate
    /// inside its `(min, max)` bound. `eps` is the finite-difference
    /// perturbation size used for gradient estimation.
    fn minimize<F: Fn(&[f64]) -> f64>(
        &self,
        objective: F,
        x0: &[f64],
        bounds: &[(f64, f64)],
        eps: f64,
    ) -> MinimizeOutcome;
}
