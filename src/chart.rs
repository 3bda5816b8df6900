//! Bar chart rendering for pivot summaries
//!
//! One grouped bar chart per summary: rows on the categorical x axis,
//! one colored bar series per positive-key column. Single-series
//! summaries (the MPHF family) render without a legend.

use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pivot::PivotSummary;

const CHART_SIZE: (u32, u32) = (1200, 700);
const BAR_GROUP_WIDTH: f64 = 0.8;

/// Render `summary` as a bar chart at `path`.
///
/// NaN cells draw no bar. The y range spans zero to 10% above the
/// largest finite cell.
///
/// # Errors
///
/// [`Error::Chart`] when the plotters backend fails.
pub fn render(
    summary: &PivotSummary,
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let chart_err = |e: &dyn std::fmt::Display| Error::Chart {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let y_max = summary.max_cell().unwrap_or(1.0).max(1e-12) * 1.1;
    #[allow(clippy::cast_precision_loss)]
    let x_max = summary.row_count().max(1) as f64;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(|e| chart_err(&e))?;

    let row_labels = summary.row_labels.clone();
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .disable_x_mesh()
        .x_labels(summary.row_count())
        .x_label_formatter(&move |x: &f64| {
            // label the center of each row slot
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = x.floor() as usize;
            row_labels.get(idx).cloned().unwrap_or_default()
        })
        .draw()
        .map_err(|e| chart_err(&e))?;

    let cols = summary.col_count();
    #[allow(clippy::cast_precision_loss)]
    let bar_width = BAR_GROUP_WIDTH / cols as f64;
    for (col, col_label) in summary.col_labels.iter().enumerate() {
        let color = Palette99::pick(col).mix(0.9);
        #[allow(clippy::cast_precision_loss)]
        let bars = summary.cells.iter().enumerate().filter_map(|(row, cells)| {
            let value = cells[col];
            if !value.is_finite() {
                return None;
            }
            let x0 = row as f64 + (1.0 - BAR_GROUP_WIDTH) / 2.0 + col as f64 * bar_width;
            Some(Rectangle::new([(x0, 0.0), (x0 + bar_width, value)], color.filled()))
        });
        let series = chart.draw_series(bars).map_err(|e| chart_err(&e))?;
        if !summary.is_single_series() {
            series
                .label(col_label.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }
    }

    if !summary.is_single_series() {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(|e| chart_err(&e))?;
    }

    root.present().map_err(|e| chart_err(&e))?;
    debug!(path = %path.display(), "rendered chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let summary = PivotSummary {
            row_labels: vec!["1/128".into(), "1/1024".into()],
            col_labels: vec!["1000".into(), "9000".into()],
            cells: vec![vec![0.008, 0.007], vec![0.001, f64::NAN]],
        };
        render(&summary, &path, "Bloom Filter", "Target FPP", "Observed FPP").unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_render_single_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.png");
        let summary = PivotSummary {
            row_labels: vec!["1000".into()],
            col_labels: vec![String::new()],
            cells: vec![vec![42.0]],
        };
        render(&summary, &path, "MPHF", "Positive Keys", "Size").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_all_nan_summary() {
        // no finite cells: still renders an (empty) chart
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let summary = PivotSummary {
            row_labels: vec!["a".into()],
            col_labels: vec!["1".into(), "2".into()],
            cells: vec![vec![f64::NAN, f64::NAN]],
        };
        render(&summary, &path, "Empty", "x", "y").unwrap();
        assert!(path.exists());
    }
}
