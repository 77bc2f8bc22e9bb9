//! Nonlinear least-squares capability and its default implementation.
//!
//! The default solver delegates to the MINPACK-derived `levenberg-marquardt`
//! crate. This module only adapts a plain residual closure to its
//! `LeastSquaresProblem` interface and maps its termination report onto
//! `Termination` / `FitError`.

use levenberg_marquardt::{self as lm, LeastSquaresProblem, TerminationReason};
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};

use crate::domain::Termination;
use crate::error::{FailureReason, FitError};

/// Converged solution and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresSolution {
    pub params: Vec<f64>,
    pub residuals: Vec<f64>,
    pub sse: f64,
    pub evaluations: usize,
    pub termination: Termination,
}

/// A nonlinear least-squares capability.
///
/// Implementations minimize the sum of squares of `residual_fn`, starting at
/// `initial_guess`. The residual function always receives a slice of the same
/// length as `initial_guess`.
pub trait LeastSquaresSolver {
    fn minimize(
        &self,
        residual_fn: &dyn Fn(&[f64]) -> Vec<f64>,
        initial_guess: &[f64],
    ) -> Result<LeastSquaresSolution, FitError>;
}

/// Tolerances handed to the routine.
///
/// Defaults follow MINPACK `lmdif`: `ftol = xtol = 1.49012e-8`, `gtol = 0`, and at
/// most `200 * (n + 1)` residual evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmOptions {
    /// Stop when the relative reduction of the sum of squares is at most this.
    pub ftol: f64,
    /// Stop when the relative change of the parameters is at most this.
    pub xtol: f64,
    /// Stop when the residuals are this close to orthogonal to the Jacobian.
    pub gtol: f64,
    /// Evaluation budget multiplier, `patience * (n + 1)`.
    pub patience: usize,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
            patience: 200,
        }
    }
}

/// Default solver: Levenberg-Marquardt with a forward-difference Jacobian.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    pub options: LmOptions,
}

impl LevenbergMarquardt {
    pub fn with_options(options: LmOptions) -> Self {
        Self { options }
    }

    fn routine(&self) -> lm::LevenbergMarquardt<f64> {
        lm::LevenbergMarquardt::new()
            .with_ftol(self.options.ftol)
            .with_xtol(self.options.xtol)
            .with_gtol(self.options.gtol)
            .with_patience(self.options.patience.max(1))
    }
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn minimize(
        &self,
        residual_fn: &dyn Fn(&[f64]) -> Vec<f64>,
        initial_guess: &[f64],
    ) -> Result<LeastSquaresSolution, FitError> {
        if initial_guess.is_empty() {
            return Err(FitError::DegenerateInput("empty initial guess".into()));
        }
        let start = residual_fn(initial_guess);
        if start.is_empty() {
            return Err(FitError::DegenerateInput("residual function returned no values".into()));
        }
        if start.iter().any(|r| !r.is_finite()) {
            return Err(FitError::DegenerateInput(
                "non-finite residuals at the initial guess".into(),
            ));
        }

        let problem = ResidualProblem {
            residual_fn,
            params: DVector::from_column_slice(initial_guess),
            residual_count: start.len(),
        };
        let (problem, report) = self.routine().minimize(problem);
        let evaluations = report.number_of_evaluations;
        let termination = classify(report.termination, evaluations)?;

        let params = problem.params.as_slice().to_vec();
        if params.iter().any(|p| !p.is_finite()) {
            return Err(FitError::OptimizationFailure {
                reason: FailureReason::Numerical("parameters"),
                evaluations,
            });
        }
        let residuals = residual_fn(&params);
        let sse = residuals.iter().map(|r| r * r).sum();

        Ok(LeastSquaresSolution {
            params,
            residuals,
            sse,
            evaluations,
            termination,
        })
    }
}

/// Map the routine's stop reason onto a success kind or a failure.
fn classify(reason: TerminationReason, evaluations: usize) -> Result<Termination, FitError> {
    let failed = |reason| Err(FitError::OptimizationFailure { reason, evaluations });
    match reason {
        TerminationReason::ResidualsZero | TerminationReason::Converged { ftol: true, .. } => {
            Ok(Termination::SumOfSquares)
        }
        TerminationReason::Converged { .. } => Ok(Termination::StepSize),
        TerminationReason::Orthogonal => Ok(Termination::Gradient),
        TerminationReason::LostPatience => failed(FailureReason::EvaluationLimit),
        TerminationReason::User(what) | TerminationReason::Numerical(what) => {
            failed(FailureReason::Numerical(what))
        }
        TerminationReason::NoParameters | TerminationReason::NoResiduals => Err(
            FitError::DegenerateInput("empty parameter or residual vector".into()),
        ),
        TerminationReason::WrongDimensions(what) => {
            Err(FitError::DegenerateInput(format!("dimension mismatch in {what}")))
        }
        _ => failed(FailureReason::Stalled),
    }
}

/// A residual closure seen as a `LeastSquaresProblem` over dynamic dimensions.
///
/// `residuals` keeps non-finite values: the routine's reduction test never accepts
/// a step whose norm is NaN. A non-finite Jacobian is reported as `None`.
#[derive(Clone)]
struct ResidualProblem<'a> {
    residual_fn: &'a dyn Fn(&[f64]) -> Vec<f64>,
    params: DVector<f64>,
    residual_count: usize,
}

impl ResidualProblem<'_> {
    fn evaluate(&self, params: &DVector<f64>) -> Option<Vec<f64>> {
        let r = (self.residual_fn)(params.as_slice());
        (r.len() == self.residual_count).then_some(r)
    }
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for ResidualProblem<'_> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &DVector<f64>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        self.evaluate(&self.params).map(DVector::from_vec)
    }

    /// Forward difference with step `√ε · max(|p_j|, 1)`.
    fn jacobian(&self) -> Option<DMatrix<f64>> {
        let base = self.evaluate(&self.params)?;
        let n = self.params.len();
        let step_scale = f64::EPSILON.sqrt();

        let mut jac = DMatrix::<f64>::zeros(self.residual_count, n);
        let mut shifted = self.params.clone();
        for j in 0..n {
            let h = step_scale * self.params[j].abs().max(1.0);
            shifted[j] = self.params[j] + h;
            let r = self.evaluate(&shifted)?;
            for (i, (&ri, &bi)) in r.iter().zip(base.iter()).enumerate() {
                jac[(i, j)] = (ri - bi) / h;
            }
            shifted[j] = self.params[j];
        }

        jac.iter().all(|v| v.is_finite()).then_some(jac)
    }
}
