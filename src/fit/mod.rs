//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - define the solver capability (`LeastSquaresSolver`) and its default
//! - recover 4PL parameters from a sample set

pub mod fitter;
pub mod solver;

pub use fitter::*;
pub use solver::*;
