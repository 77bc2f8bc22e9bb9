//! Human-readable formatting of fit results.
//!
//! Formatting lives in one place so the chart annotations and the log summary
//! always agree on how a parameter is printed.

use crate::domain::{FitResult, ParameterVector, SampleSet};

/// `"A = 0.50, est(A) = 0.51"`.
pub fn format_annotation(name: &str, actual: f64, estimate: f64) -> String {
    format!("{name} = {actual:.2}, est({name}) = {estimate:.2}")
}

/// One annotation line per parameter, in `A, B, C, D` order.
pub fn parameter_lines(truth: &ParameterVector, estimate: &ParameterVector) -> Vec<String> {
    ParameterVector::NAMES
        .iter()
        .zip(truth.to_array().iter().zip(estimate.to_array().iter()))
        .map(|(name, (&actual, &est))| format_annotation(name, actual, est))
        .collect()
}

/// Multi-line summary of one fit cycle.
pub fn format_fit_summary(sample: &SampleSet, fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== 4PL least-squares fit ===\n");
    if let (Some(first), Some(last)) = (sample.points.first(), sample.points.last()) {
        out.push_str(&format!(
            "Samples: n={} | x=[{:.2}, {:.2}]\n",
            sample.len(),
            first.x,
            last.x
        ));
    }
    for line in parameter_lines(&sample.truth, &fit.params) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!(
        "SSE={:.6} | RMSE={:.6} | evaluations={} | stop: {}\n",
        fit.sse,
        fit.rmse,
        fit.evaluations,
        fit.termination.display_name()
    ));

    out
}
