//! Shared mock collaborators for ergokin crates' test suites.
//!
//! Provides a deterministic stick-figure skeleton, a counting ergonomic
//! assessment stub, and minimizers with scripted outputs.

pub mod mocks;

pub use mocks::{CountingReba, FixedPointMinimizer, OffsetMinimizer, StickFigureModel};
