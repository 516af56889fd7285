use thiserror::Error;

/// Top-level error type for the posture engine.
///
/// Every variant is a configuration or programming defect surfaced before
/// the optimizer runs; optimizer non-convergence is reported as a status,
/// never as an error.
#[derive(Debug, Error)]
pub enum PostureError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown joint: {0}")]
    UnknownJoint(String),

    #[error("Frame matches no end-effector or active joint: {0}")]
    UnresolvedFrame(String),

    #[error("Joint vector dimension mismatch: expected {expected}, got {got}")]
    JointDimMismatch { expected: usize, got: usize },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Negative weight for {term}: {value}")]
    NegativeWeight { term: &'static str, value: f64 },

    #[error("Invalid variation step: {0} (must be > 0)")]
    InvalidStep(f64),

    #[error("Invalid solver setting {field}: {message}")]
    InvalidSolver {
        field: &'static str,
        message: String,
    },
}
