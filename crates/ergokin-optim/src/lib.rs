//! Constrained posture optimization for the ergokin skeleton.
//!
//! Assembles a weighted scalar objective over joint space — ergonomic risk,
//! safety-zone violation, fixed-frame deviation — and drives a bounded local
//! minimizer to a locally optimal joint vector.
//!
//! # Architecture
//!
//! ```text
//! SkeletonModel + ErgonomicModel ──► CostEvaluator ──► BoundedMinimizer ──► PostureOutcome
//!                                         ▲
//!                                   ConstraintSet
//! ```
//!
//! A [`ConstraintSet`] (joint pins plus knee-driven leg coupling) is resolved
//! once per optimization call and applied to a copy of every candidate point
//! before the cost terms are computed, so the objective stays referentially
//! transparent.

pub mod constraints;
pub mod cost;
pub mod optimizer;
pub mod solver;

pub use constraints::ConstraintSet;
pub use cost::CostEvaluator;
pub use optimizer::{PostureOptimizer, PostureOutcome};
pub use solver::ProjectedGradientSolver;
