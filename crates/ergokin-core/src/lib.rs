// ergokin-core: Types, geometry, joint layout, config, errors for the ergokin posture engine.

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod traits;
pub mod types;

pub use config::{OptimizationConfig, SolverConfig};
pub use error::{ConfigError, PostureError};
pub use layout::JointLayout;
pub use traits::{BoundedMinimizer, ErgonomicModel, MinimizeOutcome, SkeletonModel};
pub use types::{CostWeights, FixedFrame, FrameCoeffs, JointVector, Pose, SafetyZone, Side};
