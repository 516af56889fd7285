//! Mock implementations of the collaborator traits for testing.
//!
//! The mocks count their expensive calls so tests can assert that
//! zero-weighted cost terms never trigger forward kinematics or
//! assessment-feature conversion.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use ergokin_core::traits::{BoundedMinimizer, ErgonomicModel, MinimizeOutcome, SkeletonModel};
use ergokin_core::types::Pose;

// ---------------------------------------------------------------------------
// StickFigureModel
// ---------------------------------------------------------------------------

/// A 29-joint skeleton (3 spine, 7 per arm, 6 per leg) with planar
/// forward kinematics: every active joint rotates about z and extends the
/// chain by one link along x.
///
/// At the resting (all-zero) posture both end-effectors sit at
/// `(1.1, 0, 0)`. Leg coupling derives distinct hip and ankle angles
/// (`knee/2` and `knee/4`) so tests can observe which one is assigned.
#[derive(Debug)]
pub struct StickFigureModel {
    joint_names: Vec<String>,
    end_effectors: Vec<String>,
    fk_calls: AtomicUsize,
}

impl StickFigureModel {
    pub const LINK_LENGTH: f64 = 0.1;
    pub const ACTIVE_DOF: usize = 10;

    pub fn new() -> Self {
        let mut joint_names: Vec<String> = ["spine_0", "spine_1", "spine_2"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        for side in ["left", "right"] {
            for joint in [
                "shoulder_0",
                "shoulder_1",
                "shoulder_2",
                "elbow_0",
                "elbow_1",
                "wrist_0",
                "wrist_1",
            ] {
                joint_names.push(format!("{side}_{joint}"));
            }
        }
        for side in ["left", "right"] {
            for joint in ["hip_0", "hip_1", "hip_2", "knee", "ankle_0", "ankle_1"] {
                joint_names.push(format!("{side}_{joint}"));
            }
        }
        Self {
            joint_names,
            end_effectors: vec!["left_hand".to_owned(), "right_hand".to_owned()],
            fk_calls: AtomicUsize::new(0),
        }
    }

    /// Number of forward-kinematic evaluations performed so far.
    pub fn fk_calls(&self) -> usize {
        self.fk_calls.load(Ordering::Relaxed)
    }

    /// End-effector position of the resting (all-zero) posture.
    pub fn rest_end_effector() -> Vector3<f64> {
        Vector3::new(Self::LINK_LENGTH * (Self::ACTIVE_DOF + 1) as f64, 0.0, 0.0)
    }

    fn chain(active: &[f64]) -> Vec<Pose> {
        let mut poses = Vec::with_capacity(active.len() + 1);
        let mut pose = Isometry3::identity();
        for &angle in active {
            pose *= Isometry3::from_parts(
                Translation3::new(Self::LINK_LENGTH, 0.0, 0.0),
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
            );
            poses.push(pose);
        }
        // Hand frame: one trailing link past the last wrist axis.
        pose *= Isometry3::from_parts(
            Translation3::new(Self::LINK_LENGTH, 0.0, 0.0),
            UnitQuaternion::identity(),
        );
        poses.push(pose);
        poses
    }
}

impl Default for StickFigureModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonModel for StickFigureModel {
    fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    fn joint_limits(&self) -> Vec<(f64, f64)> {
        vec![(-std::f64::consts::PI, std::f64::consts::PI); self.joint_names.len()]
    }

    fn end_effectors(&self) -> &[String] {
        &self.end_effectors
    }

    fn forward_kinematics(&self, active: &[f64]) -> [Vec<Pose>; 2] {
        self.fk_calls.fetch_add(1, Ordering::Relaxed);
        [Self::chain(active), Self::chain(active)]
    }

    fn leg_joints(&self, knee: f64) -> (f64, f64) {
        (knee / 2.0, knee / 4.0)
    }
}

// ---------------------------------------------------------------------------
// CountingReba
// ---------------------------------------------------------------------------

/// Assessment stub scoring a posture as the sum of absolute joint values.
///
/// Counts feature conversions, the expensive half of a real assessment.
#[derive(Debug)]
pub struct CountingReba {
    conversions: AtomicUsize,
}

impl CountingReba {
    pub const fn new() -> Self {
        Self {
            conversions: AtomicUsize::new(0),
        }
    }

    /// Number of feature conversions performed so far.
    pub fn conversions(&self) -> usize {
        self.conversions.load(Ordering::Relaxed)
    }
}

impl Default for CountingReba {
    fn default() -> Self {
        Self::new()
    }
}

impl ErgonomicModel for CountingReba {
    type Features = Vec<f64>;

    fn features_from_joints(&self, joints: &[f64], _joint_names: &[String]) -> Self::Features {
        self.conversions.fetch_add(1, Ordering::Relaxed);
        joints.to_vec()
    }

    fn assess(&self, features: &Self::Features) -> f64 {
        features.iter().map(|v| v.abs()).sum()
    }
}

// ---------------------------------------------------------------------------
// Scripted minimizers
// ---------------------------------------------------------------------------

/// A minimizer that returns `x0` with a constant offset added to every
/// coordinate, modelling finite-difference residue on the final step.
pub struct OffsetMinimizer {
    offset: f64,
}

impl OffsetMinimizer {
    pub const fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl BoundedMinimizer for OffsetMinimizer {
    fn minimize<F: Fn(&[f64]) -> f64>(
        &self,
        objective: F,
        x0: &[f64],
        _bounds: &[(f64, f64)],
        _eps: f64,
    ) -> MinimizeOutcome {
        let x: Vec<f64> = x0.iter().map(|v| v + self.offset).collect();
        let cost = objective(&x);
        MinimizeOutcome {
            x,
            converged: true,
            iterations: 1,
            cost,
        }
    }
}

/// A minimizer that returns a scripted point verbatim.
pub struct FixedPointMinimizer {
    point: Vec<f64>,
    converged: bool,
}

impl FixedPointMinimizer {
    pub const fn new(point: Vec<f64>, converged: bool) -> Self {
        Self { point, converged }
    }
}

impl BoundedMinimizer for FixedPointMinimizer {
    fn minimize<F: Fn(&[f64]) -> f64>(
        &self,
        objective: F,
        _x0: &[f64],
        _bounds: &[(f64, f64)],
        _eps: f64,
    ) -> MinimizeOutcome {
        let cost = objective(&self.point);
        MinimizeOutcome {
            x: self.point.clone(),
            converged: self.converged,
            iterations: 0,
            cost,
        }
    }
}
