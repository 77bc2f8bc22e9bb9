//! Backend-agnostic chart description.
//!
//! All series, bounds and annotations are computed here; `plot::png` only draws.
//! This keeps the chart contract (three series, four annotations) testable
//! without rasterizing anything.

use crate::domain::{FitResult, SampleSet};
use crate::models::predict_all;
use crate::report::parameter_lines;

pub const CHART_TITLE: &str = "Least-squares 4PL fit to noisy data";

/// Anchor of the first annotation line, in data coordinates.
pub const ANNOTATION_X: f64 = 10.0;
pub const ANNOTATION_Y: f64 = 3.0;
/// Vertical distance between annotation lines, in data units.
pub const ANNOTATION_STEP: f64 = 0.5;

/// Fraction of the data span added on each side of the axes.
const AXIS_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Markers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub style: SeriesStyle,
    pub color: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub series: Vec<Series>,
    pub legend: LegendPosition,
    pub annotations: Vec<Annotation>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

// Default matplotlib cycle: blue, orange, green.
const FIT_COLOR: (u8, u8, u8) = (31, 119, 180);
const NOISY_COLOR: (u8, u8, u8) = (255, 127, 14);
const TRUE_COLOR: (u8, u8, u8) = (44, 160, 44);

/// Build the chart for one fit cycle: fitted curve, noisy samples, true curve,
/// and one annotation per parameter.
pub fn build_chart(sample: &SampleSet, fit: &FitResult) -> Chart {
    let xs = sample.xs();
    let fitted = predict_all(&xs, &fit.params);

    let series = vec![
        Series {
            label: "Fit",
            style: SeriesStyle::Line,
            color: FIT_COLOR,
            points: xs.iter().copied().zip(fitted).collect(),
        },
        Series {
            label: "Noisy",
            style: SeriesStyle::Markers,
            color: NOISY_COLOR,
            points: sample.points.iter().map(|p| (p.x, p.y_meas)).collect(),
        },
        Series {
            label: "True",
            style: SeriesStyle::Line,
            color: TRUE_COLOR,
            points: sample.points.iter().map(|p| (p.x, p.y_true)).collect(),
        },
    ];

    let annotations: Vec<Annotation> = parameter_lines(&sample.truth, &fit.params)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Annotation {
            x: ANNOTATION_X,
            y: ANNOTATION_Y - i as f64 * ANNOTATION_STEP,
            text,
        })
        .collect();

    let x_bounds = padded_bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let y_bounds = padded_bounds(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(annotations.iter().map(|a| a.y)),
    );

    Chart {
        title: CHART_TITLE,
        series,
        legend: LegendPosition::UpperLeft,
        annotations,
        x_bounds,
        y_bounds,
    }
}

/// Min/max of the finite values, padded on both sides. Falls back to `[0, 1]`
/// when nothing finite is left.
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !(lo.is_finite() && hi.is_finite()) {
        return [0.0, 1.0];
    }
    let span = hi - lo;
    if span <= 0.0 {
        return [lo - 0.5, hi + 0.5];
    }
    [lo - span * AXIS_PADDING, hi + span * AXIS_PADDING]
}
