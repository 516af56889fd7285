//! Pose distance metrics used by the fixed-frame cost term.

use crate::types::{FrameCoeffs, Pose};

/// Euclidean distance between the positions of two poses.
pub fn position_distance(a: &Pose, b: &Pose) -> f64 {
    (a.translation.vector - b.translation.vector).norm()
}

/// Angular distance between the orientations of two poses.
///
/// Computed as `acos(2 * (qa . qb)^2 - 1)` over the unit quaternions, which
/// is invariant under the quaternion double cover. The acos argument is
/// clamped to `[-1, 1]`: float drift in the dot product can push it a few
/// ulps outside the domain for near-identical orientations.
pub fn orientation_distance(a: &Pose, b: &Pose) -> f64 {
    let dot = a.rotation.coords.dot(&b.rotation.coords);
    (2.0 * dot * dot - 1.0).clamp(-1.0, 1.0).acos()
}

/// Weighted deviation of `pose` from `desired`.
pub fn frame_deviation_cost(pose: &Pose, desired: &Pose, coeffs: FrameCoeffs) -> f64 {
    coeffs.position * position_distance(pose, desired)
        + coeffs.orientation * orientation_distance(pose, desired)
}
