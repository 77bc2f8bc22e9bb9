//! Error types.
//!
//! - `FitError` is the library-level taxonomy for one generate → fit → render cycle.
//! - `AppError` is what the binary reports: a message plus a process exit code.
//!
//! Exit codes follow one convention across the crate:
//! - `2`: invalid configuration or input
//! - `4`: computation, rendering, or server failure

use thiserror::Error;

/// Why the least-squares solver gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The evaluation budget ran out before any convergence test passed.
    EvaluationLimit,
    /// No step can improve the sum of squares at the requested tolerances.
    Stalled,
    /// A non-finite or unusable Jacobian, residual vector, or estimate.
    Numerical(&'static str),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::EvaluationLimit => f.write_str("evaluation limit reached"),
            FailureReason::Stalled => f.write_str("no further improvement possible"),
            FailureReason::Numerical(what) => write!(f, "non-finite {what}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("optimization failed after {evaluations} evaluations: {reason}")]
    OptimizationFailure {
        reason: FailureReason,
        evaluations: usize,
    },

    /// Non-finite model output where the solver needs a finite objective
    /// (for example `C = 0` evaluated at `x = 0`).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("chart rendering failed: {0}")]
    Rendering(String),

    #[error("failed to serialize fit report: {0}")]
    Report(String),

    #[error("invalid fit configuration: {0}")]
    InvalidConfig(String),
}

impl FitError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidConfig(_) => 2,
            _ => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
