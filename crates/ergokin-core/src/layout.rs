//! Canonical joint ordering and one-time name resolution.
//!
//! Joint names are resolved to indices when a [`JointLayout`] is built, so
//! the per-evaluation hot path works on plain indices instead of repeated
//! name scans.

use std::collections::HashMap;

use crate::error::PostureError;
use crate::types::{JointVector, Side};

/// Joints of one side's upper-body chain, in chain order: the shared spine
/// followed by that side's shoulder, elbow, and wrist axes.
pub fn active_joint_names(side: Side) -> Vec<String> {
    let prefix = side.prefix();
    let mut names = vec![
        "spine_0".to_owned(),
        "spine_1".to_owned(),
        "spine_2".to_owned(),
    ];
    for suffix in [
        "shoulder_0",
        "shoulder_1",
        "shoulder_2",
        "elbow_0",
        "elbow_1",
        "wrist_0",
        "wrist_1",
    ] {
        names.push(format!("{prefix}_{suffix}"));
    }
    names
}

/// Name-to-index map over a skeleton model's canonical joint ordering.
#[derive(Debug, Clone)]
pub struct JointLayout {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl JointLayout {
    pub fn new(joint_names: &[String]) -> Self {
        let index = joint_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names: joint_names.to_vec(),
            index,
        }
    }

    /// Number of joints in the layout.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Canonical joint names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a named joint.
    ///
    /// # Errors
    ///
    /// [`PostureError::UnknownJoint`] if the name is absent from the model's
    /// ordering. This is a configuration defect and is never retried.
    pub fn index(&self, name: &str) -> Result<usize, PostureError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PostureError::UnknownJoint(name.to_owned()))
    }

    /// Indices of one side's active chain, in chain order.
    pub fn active_indices(&self, side: Side) -> Result<Vec<usize>, PostureError> {
        active_joint_names(side)
            .iter()
            .map(|name| self.index(name))
            .collect()
    }

    /// Point read of a named joint's value.
    pub fn value(&self, joints: &JointVector, name: &str) -> Result<f64, PostureError> {
        Ok(joints[self.index(name)?])
    }

    /// In-place overwrite of named entries.
    pub fn set_values(
        &self,
        joints: &mut JointVector,
        values: &HashMap<String, f64>,
    ) -> Result<(), PostureError> {
        for (name, &value) in values {
            joints[self.index(name)?] = value;
        }
        Ok(())
    }
}
