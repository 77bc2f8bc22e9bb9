//! Shared fit pipeline used by every HTTP route.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sample generation -> least-squares fit -> chart description
//!
//! The routes can then focus on presentation (PNG vs JSON).

use tracing::{debug, info};

use crate::data::{GaussianNoise, NoiseSource, generate_sample};
use crate::domain::{FitConfig, FitResult, SampleSet};
use crate::error::FitError;
use crate::fit::{LeastSquaresSolver, LevenbergMarquardt, fit_logistic};
use crate::plot::{Chart, build_chart};
use crate::report::format_fit_summary;

/// All computed outputs of a single cycle.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub sample: SampleSet,
    pub fit: FitResult,
    pub chart: Chart,
}

/// Execute one cycle with injected noise and solver.
pub fn run_fit<N, S>(config: &FitConfig, noise: &mut N, solver: &S) -> Result<FitRun, FitError>
where
    N: NoiseSource + ?Sized,
    S: LeastSquaresSolver + ?Sized,
{
    // 1) Synthetic data.
    let sample = generate_sample(config, noise)?;

    // 2) Recover the parameters.
    let fit = fit_logistic(&sample, config.initial_guess, solver)?;
    debug!("{}", format_fit_summary(&sample, &fit));
    info!(
        a = fit.params.a,
        b = fit.params.b,
        c = fit.params.c,
        d = fit.params.d,
        evaluations = fit.evaluations,
        "fit cycle complete"
    );

    // 3) Describe the chart.
    let chart = build_chart(&sample, &fit);

    Ok(FitRun { sample, fit, chart })
}

/// Execute one cycle with the default solver.
///
/// With `seed = None` the noise is entropy-seeded and differs on every call.
pub fn run_default_fit(config: &FitConfig, seed: Option<u64>) -> Result<FitRun, FitError> {
    let solver = LevenbergMarquardt::default();
    match seed {
        Some(seed) => run_fit(config, &mut GaussianNoise::seeded(seed, config.noise_std)?, &solver),
        None => run_fit(config, &mut GaussianNoise::from_entropy(config.noise_std)?, &solver),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FixedNoise;
    use crate::data::sample::fixtures;

    #[test]
    fn pipeline_wires_sample_fit_and_chart() {
        let cfg = FitConfig::default();
        let mut noise = FixedNoise::new(fixtures::NOISE.to_vec());
        let run = run_fit(&cfg, &mut noise, &LevenbergMarquardt::default()).unwrap();

        assert_eq!(run.sample.len(), cfg.sample_count);
        assert!(run.fit.params.max_abs_diff(&cfg.truth) <= 0.3);
        assert_eq!(run.chart.series.len(), 3);
        assert_eq!(run.chart.annotations.len(), 4);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let cfg = FitConfig::default();
        let a = run_default_fit(&cfg, Some(11)).unwrap();
        let b = run_default_fit(&cfg, Some(11)).unwrap();
        assert_eq!(a.sample, b.sample);
        assert_eq!(a.fit, b.fit);
    }

    #[test]
    fn unseeded_runs_draw_fresh_noise() {
        let cfg = FitConfig::default();
        let a = generate_sample(&cfg, &mut GaussianNoise::from_entropy(cfg.noise_std).unwrap()).unwrap();
        let b = generate_sample(&cfg, &mut GaussianNoise::from_entropy(cfg.noise_std).unwrap()).unwrap();
        assert_ne!(a.y_meas(), b.y_meas());
    }

    #[test]
    fn invalid_config_surfaces_before_fitting() {
        let cfg = FitConfig {
            noise_std: -0.2,
            ..FitConfig::default()
        };
        assert!(matches!(run_default_fit(&cfg, Some(1)), Err(FitError::InvalidConfig(_))));
    }
}
