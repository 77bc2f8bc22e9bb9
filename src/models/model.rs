//! 4PL model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(x)` for a parameter vector (samples, residuals, plots)
//! - residuals `y - y(x)` for the least-squares objective
//!
//! Numerical notes:
//! - `C = 0` is not guarded. `x / C` then follows IEEE semantics: `x = 0` yields
//!   NaN and `x > 0` saturates to `D`. The solver rejects non-finite trial steps.
//! - For non-integer `B` and `x / C < 0`, `powf` yields NaN the same way.

use crate::domain::ParameterVector;

/// Evaluate `(A - D) / (1 + (x / C)^B) + D`.
pub fn logistic4(x: f64, p: &ParameterVector) -> f64 {
    (p.a - p.d) / (1.0 + (x / p.c).powf(p.b)) + p.d
}

/// Evaluate the curve at every `x`, preserving order.
pub fn predict_all(xs: &[f64], p: &ParameterVector) -> Vec<f64> {
    xs.iter().map(|&x| logistic4(x, p)).collect()
}

/// Deviations of observations from the curve: `y_i - y(x_i)`.
///
/// `y` and `x` must have the same length. This is not checked; the shorter of the
/// two determines the output length.
pub fn residuals(p: &ParameterVector, y: &[f64], x: &[f64]) -> Vec<f64> {
    y.iter()
        .zip(x.iter())
        .map(|(&yi, &xi)| yi - logistic4(xi, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TRUE_PARAMS;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn curve_starts_at_a_and_tends_to_d() {
        let p = TRUE_PARAMS;
        assert_relative_eq!(logistic4(0.0, &p), p.a, epsilon = 1e-12);
        assert_relative_eq!(logistic4(1e6, &p), p.d, epsilon = 1e-9);
    }

    #[test]
    fn inflection_point_is_halfway() {
        let p = TRUE_PARAMS;
        assert_relative_eq!(logistic4(p.c, &p), (p.a + p.d) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn canonical_curve_moves_monotonically_from_a_to_d() {
        let xs: Vec<f64> = (0..=200).map(|i| i as f64 * 0.1).collect();

        // A < D: rising.
        let rising = predict_all(&xs, &TRUE_PARAMS);
        for w in rising.windows(2) {
            assert!(w[0] <= w[1], "expected non-decreasing, got {} > {}", w[0], w[1]);
        }

        // A > D: falling.
        let swapped = ParameterVector::new(TRUE_PARAMS.d, TRUE_PARAMS.b, TRUE_PARAMS.c, TRUE_PARAMS.a);
        let falling = predict_all(&xs, &swapped);
        for w in falling.windows(2) {
            assert!(w[0] >= w[1], "expected non-increasing, got {} < {}", w[0], w[1]);
        }
    }

    #[test]
    fn zero_inflection_point_is_not_guarded() {
        let p = ParameterVector::new(0.5, 2.5, 0.0, 7.3);
        assert!(logistic4(0.0, &p).is_nan());
    }

    #[test]
    fn predict_all_preserves_length_and_order() {
        let xs = [0.0, 4.0, 8.0, 16.0];
        let ys = predict_all(&xs, &TRUE_PARAMS);
        assert_eq!(ys.len(), xs.len());
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(*y, logistic4(*x, &TRUE_PARAMS));
        }
    }

    proptest! {
        #[test]
        fn residuals_are_observation_minus_model(
            ys in prop::collection::vec(-50.0f64..50.0, 1..40),
            a in -5.0f64..5.0,
            b in 0.1f64..5.0,
            c in 0.5f64..20.0,
            d in -5.0f64..10.0,
        ) {
            let p = ParameterVector::new(a, b, c, d);
            let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64 * 0.75).collect();
            let r = residuals(&p, &ys, &xs);
            prop_assert_eq!(r.len(), ys.len());
            for i in 0..ys.len() {
                prop_assert_eq!(r[i], ys[i] - logistic4(xs[i], &p));
            }
        }
    }
}
