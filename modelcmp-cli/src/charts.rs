//! SVG comparison charts drawn from ranked rows.
//!
//! Three charts are produced: composite score per model (best model
//! highlighted), the same bars annotated with their scores, and accuracy
//! against cost with the best model(s) drawn as triangles.

use anyhow::Result;
use modelcmp_core::RankedRow;
use modelcmp_core::config::ChartConfig;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use tracing::info;

pub const COMPOSITE_CHART: &str = "composite_scores.svg";
pub const LABELED_CHART: &str = "composite_scores_labeled.svg";
pub const SCATTER_CHART: &str = "accuracy_vs_cost.svg";

const BEST_COLOR: RGBColor = RGBColor(0x4B, 0x73, 0xB8);
const OTHER_COLOR: RGBColor = RGBColor(0xCC, 0x84, 0x55);

/// Render all charts into `dir`, returning the written paths.
pub fn render_all(rows: &[RankedRow], config: &ChartConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let composite = dir.join(COMPOSITE_CHART);
    composite_bars(rows, config, &composite, false)?;

    let labeled = dir.join(LABELED_CHART);
    composite_bars(rows, config, &labeled, true)?;

    let scatter = dir.join(SCATTER_CHART);
    accuracy_vs_cost(rows, config, &scatter)?;

    let written = vec![composite, labeled, scatter];
    info!(dir = %dir.display(), charts = written.len(), "Rendered charts");
    Ok(written)
}

/// Bar chart of composite score per model, in ranked order.
pub fn composite_bars(rows: &[RankedRow], config: &ChartConfig, path: &Path, labels: bool) -> Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = rows.len() as u32;
    let top = rows
        .iter()
        .map(|r| r.composite_score)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.15;
    let names: Vec<String> = rows.iter().map(|r| r.model().to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Composite Score per Model", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Model")
        .y_desc("Composite Score")
        .draw()?;

    let bar = |i: usize, row: &RankedRow, color: RGBColor| {
        let mut rect = Rectangle::new(
            [
                (SegmentValue::Exact(i as u32), 0.0),
                (SegmentValue::Exact(i as u32 + 1), row.composite_score),
            ],
            color.filled(),
        );
        rect.set_margin(0, 0, 8, 8);
        rect
    };

    chart
        .draw_series(
            rows.iter()
                .enumerate()
                .filter(|(_, r)| r.is_overall_best)
                .map(|(i, r)| bar(i, r, BEST_COLOR)),
        )?
        .label("✅ Best")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], BEST_COLOR.filled()));

    chart
        .draw_series(
            rows.iter()
                .enumerate()
                .filter(|(_, r)| !r.is_overall_best)
                .map(|(i, r)| bar(i, r, OTHER_COLOR)),
        )?
        .label("Other")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], OTHER_COLOR.filled()));

    if labels {
        let style = TextStyle::from(("sans-serif", 14).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
            Text::new(
                format!("{:.2}", r.composite_score),
                (SegmentValue::CenterOf(i as u32), r.composite_score),
                style.clone(),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Scatter of accuracy against cost, one color per model.
pub fn accuracy_vs_cost(rows: &[RankedRow], config: &ChartConfig, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height + 100)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = padded_ranges(rows);

    let mut chart = ChartBuilder::on(&root)
        .caption("Accuracy vs Cost for Best Variants", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Cost ($)")
        .y_desc("Accuracy")
        .draw()?;

    for (i, row) in rows.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        let point = (row.row().cost, row.row().accuracy);
        let label = if row.is_overall_best {
            format!("{} (best)", row.model())
        } else {
            row.model().to_string()
        };

        if row.is_overall_best {
            chart
                .draw_series(std::iter::once(TriangleMarker::new(point, 10, color.filled())))?
                .label(label)
                .legend(move |(x, y)| TriangleMarker::new((x + 6, y), 6, color.filled()));
        } else {
            chart
                .draw_series(std::iter::once(Circle::new(point, 7, color.filled())))?
                .label(label)
                .legend(move |(x, y)| Circle::new((x + 6, y), 5, color.filled()));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Axis ranges around the data with 10% padding, never collapsing to a point.
fn padded_ranges(rows: &[RankedRow]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let span = |values: Vec<f64>, floor: f64| {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return 0.0..1.0;
        }
        let pad = ((max - min) * 0.1).max(floor);
        (min - pad).max(0.0)..(max + pad)
    };
    let costs = rows.iter().map(|r| r.row().cost).collect();
    let accuracies = rows.iter().map(|r| r.row().accuracy).collect();
    (span(costs, 1.0), span(accuracies, 0.01))
}
