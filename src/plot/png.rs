//! Plotters-powered PNG rendering of a `Chart`.
//!
//! Plotters draws into an in-memory RGB buffer (`BitMapBackend::with_buffer`);
//! the buffer is then PNG-encoded without touching the filesystem.
//!
//! Styling loosely follows matplotlib defaults: white background, light mesh,
//! legend in the upper left, plain-text annotations in data coordinates.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::FitError;
use crate::plot::chart::{Chart, LegendPosition, SeriesStyle};

const FONT_FAMILY: &str = "sans-serif";
const MARKER_RADIUS: u32 = 3;

/// Render `chart` to PNG bytes.
pub fn render_png(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>, FitError> {
    validate(chart, width, height)?;

    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        draw_chart(&root, chart).map_err(|e| FitError::Rendering(e.to_string()))?;
        root.present().map_err(|e| FitError::Rendering(e.to_string()))?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&rgb, width, height, ColorType::Rgb8)
        .map_err(|e| FitError::Rendering(format!("PNG encoding: {e}")))?;
    Ok(png)
}

fn validate(chart: &Chart, width: u32, height: u32) -> Result<(), FitError> {
    if width == 0 || height == 0 {
        return Err(FitError::Rendering(format!("invalid image size {width}x{height}")));
    }

    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
        return Err(FitError::Rendering("invalid axis bounds".into()));
    }

    // Every series is drawn over the same x grid.
    if let Some(first) = chart.series.first() {
        if let Some(bad) = chart.series.iter().find(|s| s.points.len() != first.points.len()) {
            return Err(FitError::Rendering(format!(
                "series '{}' has {} points, expected {}",
                bad.label,
                bad.points.len(),
                first.points.len()
            )));
        }
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;

    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title, (FONT_FAMILY, 20).into_font())
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .light_line_style(&WHITE)
        .bold_line_style(&RGBColor(220, 220, 220))
        .label_style((FONT_FAMILY, 12).into_font())
        .x_labels(6)
        .y_labels(6)
        .draw()?;

    for series in &chart.series {
        let (r, g, b) = series.color;
        let color = RGBColor(r, g, b);
        // Non-finite points (a diverged estimate) are skipped rather than drawn off-canvas.
        let points = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        match series.style {
            SeriesStyle::Line => {
                ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?
                    .label(series.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
            SeriesStyle::Markers => {
                ctx.draw_series(points.map(|p| Circle::new(p, MARKER_RADIUS, color.filled())))?
                    .label(series.label)
                    .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_RADIUS, color.filled()));
            }
        }
    }

    ctx.draw_series(chart.annotations.iter().map(|a| {
        Text::new(a.text.clone(), (a.x, a.y), (FONT_FAMILY, 13).into_font())
    }))?;

    let position = match chart.legend {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
    };
    ctx.configure_series_labels()
        .position(position)
        .background_style(&WHITE.mix(0.8))
        .border_style(&RGBColor(200, 200, 200))
        .label_font((FONT_FAMILY, 13).into_font())
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FixedNoise, generate_sample};
    use crate::domain::{FitConfig, FitResult, INITIAL_GUESS, TRUE_PARAMS, Termination};
    use crate::plot::chart::build_chart;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn sample_chart() -> Chart {
        let sample = generate_sample(&FitConfig::default(), &mut FixedNoise::new(vec![0.05, -0.05])).unwrap();
        let fit = FitResult {
            params: TRUE_PARAMS,
            initial_guess: INITIAL_GUESS,
            sse: 0.05,
            rmse: 0.05,
            evaluations: 45,
            termination: Termination::SumOfSquares,
        };
        build_chart(&sample, &fit)
    }

    #[test]
    fn renders_png_bytes() {
        let png = render_png(&sample_chart(), 640, 480).unwrap();
        assert!(png.len() > PNG_SIGNATURE.len());
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn rejects_empty_canvas() {
        let err = render_png(&sample_chart(), 0, 480).unwrap_err();
        assert!(matches!(err, FitError::Rendering(_)));
    }

    #[test]
    fn rejects_mismatched_series() {
        let mut chart = sample_chart();
        chart.series[2].points.pop();
        let err = render_png(&chart, 640, 480).unwrap_err();
        assert!(matches!(err, FitError::Rendering(msg) if msg.contains("True")));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut chart = sample_chart();
        chart.y_bounds = [5.0, 1.0];
        assert!(render_png(&chart, 640, 480).is_err());
    }
}
