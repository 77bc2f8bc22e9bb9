//! Shared domain types.
//!
//! Everything here lives for exactly one generate → fit → render cycle. The types
//! are serializable so a cycle can be exported as a JSON report.

use serde::{Deserialize, Serialize};

/// Number of synthetic observations per cycle.
pub const SAMPLE_COUNT: usize = 20;

/// Closed x range the samples are spread over.
pub const X_MIN: f64 = 0.0;
pub const X_MAX: f64 = 20.0;

/// Parameters the synthetic data is generated from.
pub const TRUE_PARAMS: ParameterVector = ParameterVector::new(0.5, 2.5, 8.0, 7.3);

/// Standard deviation of the additive Gaussian measurement noise.
pub const NOISE_STD: f64 = 0.2;

/// Starting point handed to the solver.
pub const INITIAL_GUESS: ParameterVector = ParameterVector::new(0.0, 1.0, 1.0, 1.0);

/// Parameters of the 4-parameter logistic curve
/// `y(x) = (A - D) / (1 + (x / C)^B) + D`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    /// Response at `x = 0`.
    pub a: f64,
    /// Hill slope.
    pub b: f64,
    /// Inflection point: the x where the response is halfway between A and D.
    pub c: f64,
    /// Response as `x → ∞`.
    pub d: f64,
}

impl ParameterVector {
    /// Display names, in storage order.
    pub const NAMES: [&'static str; 4] = ["A", "B", "C", "D"];

    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Build from a solver vector. Returns `None` unless exactly four values are given.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            &[a, b, c, d] => Some(Self::new(a, b, c, d)),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Largest absolute per-parameter difference.
    pub fn max_abs_diff(&self, other: &ParameterVector) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// A single synthetic observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    /// Noise-free curve value.
    pub y_true: f64,
    /// `y_true` plus measurement noise. This is what gets fitted.
    pub y_meas: f64,
}

/// Ordered synthetic data set plus the parameters it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub truth: ParameterVector,
    pub points: Vec<SamplePoint>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_true(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y_true).collect()
    }

    pub fn y_meas(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y_meas).collect()
    }
}

/// Which convergence test stopped the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Relative reduction of the sum of squares fell below `ftol`, or the
    /// residuals vanished.
    SumOfSquares,
    /// Relative step length fell below `xtol`.
    StepSize,
    /// Residuals became orthogonal to the Jacobian columns (`gtol`).
    Gradient,
}

impl Termination {
    pub fn display_name(self) -> &'static str {
        match self {
            Termination::SumOfSquares => "sum-of-squares tolerance",
            Termination::StepSize => "step-size tolerance",
            Termination::Gradient => "gradient tolerance",
        }
    }
}

/// Estimated parameters plus solver diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: ParameterVector,
    pub initial_guess: ParameterVector,
    /// Sum of squared residuals at `params`.
    pub sse: f64,
    pub rmse: f64,
    /// Residual evaluations counted by the solver.
    pub evaluations: usize,
    pub termination: Termination,
}

/// Fixed inputs for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub sample_count: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub truth: ParameterVector,
    pub noise_std: f64,
    pub initial_guess: ParameterVector,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            sample_count: SAMPLE_COUNT,
            x_min: X_MIN,
            x_max: X_MAX,
            truth: TRUE_PARAMS,
            noise_std: NOISE_STD,
            initial_guess: INITIAL_GUESS,
        }
    }
}
