//! Rendering of summary and ranked tables as terminal text, markdown, CSV or JSON.

use modelcmp_core::columns;
use modelcmp_core::config::{DisplayConfig, FlagStyle, OutputFormat};
use modelcmp_core::{Metric, MetricWeights, NormalizedScores, RankedRow, ResultRow, SummaryRow};
use unicode_width::UnicodeWidthStr;

/// A rendered-to-strings table: header row plus cells.
struct Grid {
    headers: Vec<String>,
    numeric: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn new() -> Self {
        Self {
            headers: Vec::new(),
            numeric: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn column(&mut self, name: &str, numeric: bool) {
        self.headers.push(name.to_string());
        self.numeric.push(numeric);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.width())
                    .chain(std::iter::once(h.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn to_text(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| pad(c, widths[i], self.numeric[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut out = String::new();
        out.push_str(&line(self.headers.as_slice()));
        out.push('\n');
        out.push_str(&format!("{:-<total$}\n", ""));
        for row in &self.rows {
            out.push_str(&line(row.as_slice()));
            out.push('\n');
        }
        out
    }

    fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        let rule: Vec<&str> = self
            .numeric
            .iter()
            .map(|n| if *n { "---:" } else { "---" })
            .collect();
        out.push_str(&format!("| {} |\n", rule.join(" | ")));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }

    fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn pad(cell: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    if right {
        format!("{fill}{cell}")
    } else {
        format!("{cell}{fill}")
    }
}

/// Cell formatting for one output format.
struct Cells<'a> {
    format: OutputFormat,
    display: &'a DisplayConfig,
}

impl Cells<'_> {
    fn plain(&self) -> bool {
        self.format == OutputFormat::Csv || self.display.flag_style == FlagStyle::Plain
    }

    fn number(&self, value: f64) -> String {
        if self.format == OutputFormat::Csv {
            value.to_string()
        } else {
            format!("{:.*}", self.display.decimals, value)
        }
    }

    fn best_cost(&self, flag: bool) -> String {
        match (self.plain(), flag) {
            (true, f) => f.to_string(),
            (false, true) => "🟩 True".to_string(),
            (false, false) => "🟥 False".to_string(),
        }
    }

    fn overall_best(&self, flag: bool) -> String {
        match (self.plain(), flag) {
            (true, f) => f.to_string(),
            (false, true) => "✅ Best".to_string(),
            (false, false) => String::new(),
        }
    }
}

/// Extra pass-through columns across all rows, in first-seen order.
fn extra_columns<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for key in row.extra.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn extra_cell(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Base columns shared by summary and ranked tables.
fn base_grid(rows: &[&ResultRow], cells: &Cells<'_>) -> Grid {
    let has_variant = rows.iter().any(|r| r.variant.is_some());
    let extras = extra_columns(rows.iter().copied());

    let mut grid = Grid::new();
    grid.column(columns::MODEL, false);
    if has_variant {
        grid.column(columns::VARIANT, false);
    }
    for metric in Metric::ALL {
        grid.column(metric.label(), true);
    }
    for name in &extras {
        grid.column(name, false);
    }

    for row in rows {
        let mut line = vec![row.model.clone()];
        if has_variant {
            line.push(row.variant.clone().unwrap_or_default());
        }
        for metric in Metric::ALL {
            line.push(cells.number(row.metric(metric)));
        }
        for name in &extras {
            line.push(extra_cell(row.extra.get(name)));
        }
        grid.rows.push(line);
    }
    grid
}

fn finish<T: serde::Serialize>(
    rows: &[T],
    grid: &Grid,
    format: OutputFormat,
    heading: &str,
    preamble: &str,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => {
            let mut out = String::new();
            if !preamble.is_empty() {
                out.push_str(preamble);
                out.push_str("\n\n");
            }
            out.push_str(&grid.to_text());
            out
        }
        OutputFormat::Markdown => {
            let mut out = format!("## {heading}\n\n");
            out.push_str(&format!(
                "_Generated {}_\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
            if !preamble.is_empty() {
                out.push_str(preamble);
                out.push_str("\n\n");
            }
            out.push_str(&grid.to_markdown());
            out
        }
        OutputFormat::Csv => grid.to_csv()?,
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
    })
}

/// Render the best-variant summary.
pub fn summary(rows: &[SummaryRow], format: OutputFormat, display: &DisplayConfig) -> anyhow::Result<String> {
    let cells = Cells { format, display };
    let base: Vec<&ResultRow> = rows.iter().map(|s| &s.row).collect();
    let mut grid = base_grid(&base, &cells);
    grid.column(columns::IS_BEST_COST, false);
    for (line, row) in grid.rows.iter_mut().zip(rows) {
        line.push(cells.best_cost(row.is_best_cost));
    }
    finish(rows, &grid, format, "Best Variant per Model", "")
}

/// Render the ranked table. `weights` are printed above text and markdown tables.
pub fn ranked(
    rows: &[RankedRow],
    weights: &MetricWeights,
    format: OutputFormat,
    display: &DisplayConfig,
) -> anyhow::Result<String> {
    let cells = Cells { format, display };
    let base: Vec<&ResultRow> = rows.iter().map(|r| r.row()).collect();
    let mut grid = base_grid(&base, &cells);
    grid.column(columns::IS_BEST_COST, false);
    grid.column(columns::COMPOSITE_SCORE, true);
    grid.column(columns::IS_OVERALL_BEST, false);
    for (line, row) in grid.rows.iter_mut().zip(rows) {
        line.push(cells.best_cost(row.summary.is_best_cost));
        line.push(cells.number(row.composite_score));
        line.push(cells.overall_best(row.is_overall_best));
    }
    finish(rows, &grid, format, "Composite Score by Model", &weights_line(weights))
}

/// The weights in use, e.g. `Weights: Accuracy=1.0, ... Cost ($)=2.0`.
pub fn weights_line(weights: &MetricWeights) -> String {
    let parts: Vec<String> = Metric::ALL
        .iter()
        .map(|m| format!("{}={:.1}", m, weights.weight(*m)))
        .collect();
    format!("Weights: {}", parts.join(", "))
}

/// Normalized per-metric values behind each composite score.
///
/// CSV keeps full precision; JSON is the serialized [`NormalizedScores`] list.
pub fn normalized(
    scores: &[NormalizedScores],
    format: OutputFormat,
    decimals: usize,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(scores)?);
    }

    let mut grid = Grid::new();
    grid.column(columns::MODEL, false);
    for metric in Metric::ALL {
        grid.column(&format!("n_{}", metric.label()), true);
    }
    for s in scores {
        let mut line = vec![s.model.clone()];
        for metric in Metric::ALL {
            line.push(if format == OutputFormat::Csv {
                s.get(metric).to_string()
            } else {
                format!("{:.*}", decimals, s.get(metric))
            });
        }
        grid.rows.push(line);
    }

    Ok(match format {
        OutputFormat::Csv => grid.to_csv()?,
        OutputFormat::Markdown => format!("### Normalized metrics\n\n{}", grid.to_markdown()),
        _ => format!("Normalized metrics\n{}", grid.to_text()),
    })
}
