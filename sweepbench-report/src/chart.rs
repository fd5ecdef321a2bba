//! Chart generation using plotters (SVG output)
//!
//! Charts are rendered into an in-memory SVG document and persisted
//! atomically. The SVG backend avoids any system font dependency.

use crate::ReportError;
use crate::persist::write_atomic;
use crate::report::SpeedupCurve;
use plotters::prelude::*;
use std::path::Path;

/// Chart dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}

/// Render and atomically persist the speedup chart
pub fn render_speedup_chart(
    path: &Path,
    title: &str,
    thread_counts: &[u32],
    curves: &[SpeedupCurve],
    style: ChartStyle,
) -> Result<(), ReportError> {
    let svg = render_speedup_svg(title, thread_counts, curves, style)?;
    write_atomic(path, svg.as_bytes())
}

/// Speedup vs threads as an SVG document, one line per mode.
///
/// The x axis is categorical: thread counts appear exactly in the order of
/// `thread_counts`, evenly spaced, as declared for the sweep.
pub fn render_speedup_svg(
    title: &str,
    thread_counts: &[u32],
    curves: &[SpeedupCurve],
    style: ChartStyle,
) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let max_speedup = curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.1))
            .filter(|s| s.is_finite())
            .fold(1.0f64, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0..thread_counts.len()).into_segmented(),
                0.0..max_speedup * 1.1,
            )
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_labels(thread_counts.len())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(idx) => thread_counts
                    .get(*idx)
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("Number of Threads")
            .y_desc("Speedup")
            .draw()
            .map_err(chart_err)?;

        for (idx, curve) in curves.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            let points: Vec<(SegmentValue<usize>, f64)> = curve
                .points
                .iter()
                .filter_map(|&(threads, speedup)| {
                    thread_counts
                        .iter()
                        .position(|&t| t == threads)
                        .map(|x| (SegmentValue::CenterOf(x), speedup))
                })
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(chart_err)?
                .label(curve.mode.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });

            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new(p, 4, color.filled())),
                )
                .map_err(chart_err)?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}

/// Render and atomically persist the precision-recall chart
pub fn render_pr_chart(
    path: &Path,
    title: &str,
    pairs: &[(f64, f64)],
    style: ChartStyle,
) -> Result<(), ReportError> {
    let svg = render_pr_svg(title, pairs, style)?;
    write_atomic(path, svg.as_bytes())
}

/// Precision (x) against recall (y) as an SVG document, points joined in
/// the given order. Non-finite pairs are skipped.
pub fn render_pr_svg(
    title: &str,
    pairs: &[(f64, f64)],
    style: ChartStyle,
) -> Result<String, ReportError> {
    let pairs: Vec<(f64, f64)> = pairs
        .iter()
        .copied()
        .filter(|(p, r)| p.is_finite() && r.is_finite())
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let x_max = pairs.iter().map(|p| p.0).fold(1.0f64, f64::max);
        let y_max = pairs.iter().map(|p| p.1).fold(1.0f64, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, 0.0..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Precision")
            .y_desc("Recall")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(pairs.iter().copied(), BLUE.stroke_width(2)))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use sweepbench_core::Mode;
    use tempfile::TempDir;

    fn curve(mode: &str, points: &[(u32, f64)]) -> SpeedupCurve {
        SpeedupCurve {
            mode: Mode::from(mode),
            points: points.to_vec(),
        }
    }

    #[test]
    fn test_speedup_chart_has_one_legend_entry_per_mode() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("speedup.svg");
        let threads = [2, 4, 6, 8, 12];
        let curves = vec![
            curve("p-normal", &[(2, 1.8), (4, 3.1), (6, 4.0), (8, 4.6), (12, 5.0)]),
            curve("p-steal", &[(2, 1.9), (4, 3.5), (6, 4.9), (8, 6.1), (12, 7.4)]),
        ];

        render_speedup_chart(&path, "Speedup vs Threads", &threads, &curves, ChartStyle::default())
            .unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Speedup vs Threads"));
        assert!(svg.contains("p-normal"));
        assert!(svg.contains("p-steal"));
        assert!(svg.contains("Number of Threads"));
    }

    #[test]
    fn test_pr_chart() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("results").join("pr.svg");
        let pairs = vec![(0.41, 0.97), (0.56, 0.88), (0.72, 0.61)];

        render_pr_chart(&path, "Precision - Recall Curve", &pairs, ChartStyle::default()).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Precision - Recall Curve"));
        assert!(svg.contains("Precision"));
        assert!(svg.contains("Recall"));
    }

    #[test]
    fn test_pr_svg_skips_non_finite_pairs() {
        let pairs = vec![(0.4, 0.9), (f64::INFINITY, 0.5), (0.6, f64::NAN), (0.8, 0.6)];
        let svg = render_pr_svg("Precision - Recall Curve", &pairs, ChartStyle::default()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_speedup_svg_renders_in_memory() {
        let curves = vec![curve("p-normal", &[(2, 1.8), (4, 3.1)])];
        let svg = render_speedup_svg("Speedup", &[2, 4], &curves, ChartStyle::default()).unwrap();
        assert!(svg.contains("p-normal"));
    }

    #[test]
    fn test_pr_chart_without_points() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.svg");
        render_pr_chart(&path, "Precision - Recall Curve", &[], ChartStyle::default()).unwrap();
        assert!(path.exists());
    }
}
