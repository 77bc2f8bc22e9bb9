//! 4PL parameter recovery.
//!
//! Given:
//! - sample positions `x_i`
//! - measured values `y_i`
//! - an initial parameter guess
//!
//! we minimize `Σ (y_i - y(x_i; A, B, C, D))^2` with a pluggable nonlinear
//! least-squares solver and return the estimate plus solver diagnostics.

use tracing::debug;

use crate::domain::{FitResult, ParameterVector, SampleSet};
use crate::error::FitError;
use crate::fit::solver::LeastSquaresSolver;
use crate::models::residuals;

/// Fit the 4PL model to the measured values of `sample`.
pub fn fit_logistic<S>(
    sample: &SampleSet,
    initial_guess: ParameterVector,
    solver: &S,
) -> Result<FitResult, FitError>
where
    S: LeastSquaresSolver + ?Sized,
{
    if sample.is_empty() {
        return Err(FitError::DegenerateInput("no samples to fit".into()));
    }

    let xs = sample.xs();
    let ys = sample.y_meas();
    let n = ys.len();

    let objective = |p: &[f64]| -> Vec<f64> {
        match ParameterVector::from_slice(p) {
            Some(params) => residuals(&params, &ys, &xs),
            None => vec![f64::NAN; n],
        }
    };

    let solution = solver.minimize(&objective, &initial_guess.to_array())?;
    let params = ParameterVector::from_slice(&solution.params).ok_or_else(|| {
        FitError::DegenerateInput(format!(
            "solver returned {} parameters, expected 4",
            solution.params.len()
        ))
    })?;

    debug!(
        evaluations = solution.evaluations,
        sse = solution.sse,
        termination = solution.termination.display_name(),
        "4PL fit converged"
    );

    Ok(FitResult {
        params,
        initial_guess,
        sse: solution.sse,
        rmse: (solution.sse / n as f64).sqrt(),
        evaluations: solution.evaluations,
        termination: solution.termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::fixtures;
    use crate::data::{FixedNoise, GaussianNoise, generate_sample};
    use crate::domain::{FitConfig, INITIAL_GUESS, TRUE_PARAMS, Termination};
    use crate::error::FailureReason;
    use crate::fit::solver::{LeastSquaresSolution, LevenbergMarquardt};

    #[test]
    fn fixed_noise_fit_recovers_true_parameters() {
        let mut noise = FixedNoise::new(fixtures::NOISE.to_vec());
        let sample = generate_sample(&FitConfig::default(), &mut noise).unwrap();

        let fit = fit_logistic(&sample, INITIAL_GUESS, &LevenbergMarquardt::default()).unwrap();

        assert!(
            fit.params.max_abs_diff(&TRUE_PARAMS) <= 0.3,
            "estimate {:?} too far from {:?}",
            fit.params,
            TRUE_PARAMS
        );
        assert!(fit.sse.is_finite() && fit.sse < 1.0, "sse = {}", fit.sse);
        assert_eq!(fit.initial_guess, INITIAL_GUESS);
        assert!(fit.evaluations > 0);
    }

    #[test]
    fn noise_free_fit_is_exact() {
        let mut noise = FixedNoise::new(Vec::new());
        let sample = generate_sample(&FitConfig::default(), &mut noise).unwrap();

        let fit = fit_logistic(&sample, INITIAL_GUESS, &LevenbergMarquardt::default()).unwrap();
        assert!(fit.params.max_abs_diff(&TRUE_PARAMS) < 1e-4, "{:?}", fit.params);
        assert!(fit.rmse < 1e-6);
    }

    #[test]
    fn repeated_noisy_fits_recover_parameters() {
        // With σ = 0.2 and 20 points, C and D have sampling spreads of roughly
        // 0.35 and 0.3, so a ±1.0 window holds about 99% of estimates.
        let cfg = FitConfig::default();
        let solver = LevenbergMarquardt::default();
        let mut noise = GaussianNoise::seeded(2024, cfg.noise_std).unwrap();

        let trials = 100;
        let mut recovered = 0;
        for _ in 0..trials {
            let sample = generate_sample(&cfg, &mut noise).unwrap();
            if let Ok(fit) = fit_logistic(&sample, cfg.initial_guess, &solver) {
                if fit.params.max_abs_diff(&cfg.truth) <= 1.0 {
                    recovered += 1;
                }
            }
        }
        assert!(recovered >= 95, "only {recovered}/{trials} fits recovered the parameters");
    }

    struct FixedAnswer(Vec<f64>);

    impl LeastSquaresSolver for FixedAnswer {
        fn minimize(
            &self,
            residual_fn: &dyn Fn(&[f64]) -> Vec<f64>,
            _initial_guess: &[f64],
        ) -> Result<LeastSquaresSolution, FitError> {
            let residuals = residual_fn(&self.0);
            let sse = residuals.iter().map(|r| r * r).sum();
            Ok(LeastSquaresSolution {
                params: self.0.clone(),
                residuals,
                sse,
                evaluations: 1,
                termination: Termination::StepSize,
            })
        }
    }

    struct AlwaysFails;

    impl LeastSquaresSolver for AlwaysFails {
        fn minimize(
            &self,
            _residual_fn: &dyn Fn(&[f64]) -> Vec<f64>,
            _initial_guess: &[f64],
        ) -> Result<LeastSquaresSolution, FitError> {
            Err(FitError::OptimizationFailure {
                reason: FailureReason::Stalled,
                evaluations: 3,
            })
        }
    }

    #[test]
    fn solver_is_injectable() {
        let mut noise = FixedNoise::new(Vec::new());
        let sample = generate_sample(&FitConfig::default(), &mut noise).unwrap();

        let fit = fit_logistic(&sample, INITIAL_GUESS, &FixedAnswer(TRUE_PARAMS.to_array().to_vec())).unwrap();
        assert_eq!(fit.params, TRUE_PARAMS);
        assert!(fit.sse < 1e-20);

        let err = fit_logistic(&sample, INITIAL_GUESS, &AlwaysFails).unwrap_err();
        assert!(matches!(err, FitError::OptimizationFailure { evaluations: 3, .. }));

        let err = fit_logistic(&sample, INITIAL_GUESS, &FixedAnswer(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, FitError::DegenerateInput(_)));
    }

    #[test]
    fn zero_inflection_guess_is_degenerate() {
        let mut noise = FixedNoise::new(Vec::new());
        let sample = generate_sample(&FitConfig::default(), &mut noise).unwrap();

        // x = 0 with C = 0 evaluates 0/0.
        let guess = ParameterVector::new(0.0, 1.0, 0.0, 1.0);
        let err = fit_logistic(&sample, guess, &LevenbergMarquardt::default()).unwrap_err();
        assert!(matches!(err, FitError::DegenerateInput(_)));
    }
}
