use nalgebra::{Isometry3, Vector3};
use serde::{Deserialize, Serialize};

/// A rigid-body pose: position plus unit-quaternion orientation.
pub type Pose = Isometry3<f64>;

// ---------------------------------------------------------------------------
// JointVector
// ---------------------------------------------------------------------------

/// Flat f64 vector with one entry per named joint, in the skeleton model's
/// canonical joint ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointVector {
    data: Vec<f64>,
}

impl JointVector {
    pub const fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl std::ops::Index<usize> for JointVector {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl std::ops::IndexMut<usize> for JointVector {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.data[i]
    }
}

impl From<Vec<f64>> for JointVector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which symmetric arm chain an operation targets.
///
/// `Left` is chain 0 in the per-side chain ordering, `Right` is chain 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, in chain order.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// Chain index of this side.
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Joint-name prefix of this side.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

// ---------------------------------------------------------------------------
// SafetyZone
// ---------------------------------------------------------------------------

/// Axis-aligned allowed box for the active chain's end-effector position.
///
/// Each axis holds a `(low, high)` interval. `low <= high` is the caller's
/// responsibility; the zone is not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyZone {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl SafetyZone {
    pub const fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self { x, y, z }
    }

    const fn axes(&self) -> [(f64, f64); 3] {
        [self.x, self.y, self.z]
    }

    /// Sum of absolute per-axis overshoots. Zero inside the box.
    pub fn violation(&self, position: &Vector3<f64>) -> f64 {
        let mut cost = 0.0;
        for (i, (low, high)) in self.axes().into_iter().enumerate() {
            let p = position[i];
            if p < low {
                cost += low - p;
            } else if p > high {
                cost += p - high;
            }
        }
        cost
    }
}

impl Default for SafetyZone {
    /// Unbounded zone: every position is allowed.
    fn default() -> Self {
        let all = (f64::NEG_INFINITY, f64::INFINITY);
        Self::new(all, all, all)
    }
}

// ---------------------------------------------------------------------------
// Fixed frames
// ---------------------------------------------------------------------------

/// Weights of the two sub-terms inside one fixed-frame deviation cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameCoeffs {
    pub position: f64,
    pub orientation: f64,
}

impl FrameCoeffs {
    pub const fn new(position: f64, orientation: f64) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Desired pose for one named frame (an end-effector or an active joint).
///
/// When `reference_frame` is set, the frame's pose is expressed relative to
/// that frame before comparing against `desired_pose`; otherwise the frame is
/// compared in the base frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFrame {
    pub coeffs: FrameCoeffs,
    pub desired_pose: Pose,
    pub reference_frame: Option<String>,
}

// ---------------------------------------------------------------------------
// CostWeights
// ---------------------------------------------------------------------------

const fn default_weight() -> f64 {
    1.0
}

/// Non-negative weights of the three posture cost terms.
///
/// A zero weight disables computing that term entirely, including its
/// forward-kinematic or assessment sub-computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Ergonomic (REBA) risk term.
    #[serde(default = "default_weight")]
    pub reba: f64,
    /// Safety-zone violation term.
    #[serde(default = "default_weight")]
    pub safety: f64,
    /// Fixed-frame deviation term.
    #[serde(default = "default_weight")]
    pub fixed_frame: f64,
}

impl CostWeights {
    pub const fn new(reba: f64, safety: f64, fixed_frame: f64) -> Self {
        Self {
            reba,
            safety,
            fixed_frame,
        }
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
