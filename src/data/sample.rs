//! Synthetic 4PL sample generation.
//!
//! Samples are `x = linspace(x_min, x_max, n)`, the noise-free curve at those
//! points, and the same values plus independent Gaussian noise.
//!
//! Noise comes through the `NoiseSource` seam:
//! - the server draws from an entropy-seeded RNG, so every request sees fresh noise
//! - tests either seed the RNG or replay a fixed noise sequence

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FitConfig, SamplePoint, SampleSet};
use crate::error::FitError;
use crate::math::linspace;
use crate::models::predict_all;

/// Source of additive measurement noise.
pub trait NoiseSource {
    fn sample(&mut self) -> f64;
}

/// Zero-mean Gaussian noise drawn from an RNG.
pub struct GaussianNoise<R: Rng> {
    rng: R,
    normal: Normal<f64>,
}

impl<R: Rng> GaussianNoise<R> {
    /// `std_dev` must be finite and non-negative.
    pub fn new(rng: R, std_dev: f64) -> Result<Self, FitError> {
        check_noise_std(std_dev)?;
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| FitError::InvalidConfig(format!("noise distribution: {e}")))?;
        Ok(Self { rng, normal })
    }
}

impl GaussianNoise<StdRng> {
    /// Non-reproducible noise (OS entropy).
    pub fn from_entropy(std_dev: f64) -> Result<Self, FitError> {
        Self::new(StdRng::from_entropy(), std_dev)
    }

    /// Reproducible noise.
    pub fn seeded(seed: u64, std_dev: f64) -> Result<Self, FitError> {
        Self::new(StdRng::seed_from_u64(seed), std_dev)
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn sample(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }
}

/// Replays a fixed list of noise values, wrapping around when exhausted.
///
/// An empty list yields zero noise.
#[derive(Debug, Clone)]
pub struct FixedNoise {
    values: Vec<f64>,
    next: usize,
}

impl FixedNoise {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

fn check_noise_std(std_dev: f64) -> Result<(), FitError> {
    if std_dev.is_finite() && std_dev >= 0.0 {
        Ok(())
    } else {
        Err(FitError::InvalidConfig(format!(
            "noise standard deviation must be finite and >= 0, got {std_dev}"
        )))
    }
}

/// Generate one synthetic sample set from `config.truth`.
pub fn generate_sample<N>(config: &FitConfig, noise: &mut N) -> Result<SampleSet, FitError>
where
    N: NoiseSource + ?Sized,
{
    if config.sample_count == 0 {
        return Err(FitError::InvalidConfig("sample count must be > 0".into()));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(FitError::InvalidConfig(format!(
            "invalid x range [{}, {}]",
            config.x_min, config.x_max
        )));
    }
    if !config.truth.is_finite() {
        return Err(FitError::InvalidConfig("true parameters must be finite".into()));
    }
    check_noise_std(config.noise_std)?;

    let xs = linspace(config.x_min, config.x_max, config.sample_count);
    let y_true = predict_all(&xs, &config.truth);

    let points = xs
        .iter()
        .zip(y_true.iter())
        .map(|(&x, &y)| SamplePoint {
            x,
            y_true: y,
            y_meas: y + noise.sample(),
        })
        .collect();

    Ok(SampleSet {
        truth: config.truth,
        points,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A fixed draw of `N(0, 0.2)` noise, rounded to three decimals.
    pub const NOISE: [f64; 20] = [
        0.008, 0.093, -0.092, 0.071, 0.185, 0.082, 0.312, -0.177, 0.013, -0.141, -0.157, -0.037,
        0.044, 0.084, 0.102, 0.447, 0.173, -0.319, 0.041, -0.125,
    ];

    /// Measured values for the canonical parameters plus `NOISE`.
    pub const Y_MEAS: [f64; 20] = [
        0.508,
        0.635438111657213,
        0.6412862249829262,
        1.1773403787460872,
        1.822876951954909,
        2.3489440215131836,
        3.2356007570823055,
        3.374714039107593,
        4.130698267981899,
        4.467063335118082,
        4.865659838151837,
        5.331332095210043,
        5.698587529973697,
        5.97516990852716,
        6.188927110611891,
        6.696418487263729,
        6.557891691676254,
        6.179417271780861,
        6.635072159061581,
        6.550121626603783,
    ];
}
