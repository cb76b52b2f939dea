//! Loading result tables from CSV and JSON files.

use anyhow::{Context, Result};
use modelcmp_core::ResultRow;
use modelcmp_core::ResultTable;
use modelcmp_core::columns::ColumnLayout;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load every file into result tables.
///
/// With `split_by_model` the rows of all files are pooled and split on the
/// `Model` column, so a model spread over several files still becomes one
/// table. Otherwise each file is exactly one table. A file without data rows
/// always yields an empty table so that selection reports it.
pub fn load_tables(paths: &[PathBuf], split_by_model: bool) -> Result<Vec<ResultTable>> {
    let mut tables = Vec::new();
    let mut pooled = Vec::new();
    let mut empty_files = 0;
    for path in paths {
        let rows = load_rows(path)
            .with_context(|| format!("Failed to load results from {}", path.display()))?;
        info!(path = %path.display(), rows = rows.len(), "Loaded result file");

        if rows.is_empty() {
            empty_files += 1;
        } else if split_by_model {
            pooled.extend(rows);
        } else {
            tables.push(
                ResultTable::new(rows)
                    .with_context(|| format!("Invalid result table in {}", path.display()))?,
            );
        }
    }

    if !pooled.is_empty() {
        let split = ResultTable::split_by_model(pooled).context("Invalid result rows")?;
        debug!(files = paths.len(), models = split.len(), "Split rows by model");
        tables.extend(split);
    }
    tables.extend(std::iter::repeat_with(ResultTable::default).take(empty_files));
    Ok(tables)
}

/// Read one file, choosing the parser by extension (`.json`, anything else is CSV).
pub fn load_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path)?;
        read_json(&content)
    } else {
        let file = std::fs::File::open(path)?;
        read_csv(file)
    }
}

/// Parse CSV with a header row into validated rows.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let layout = ColumnLayout::resolve(headers.iter())?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read record {}", idx + 1))?;
        let fields: Vec<&str> = record.iter().collect();
        rows.push(layout.parse_row(&fields, idx + 1)?);
    }
    Ok(rows)
}

/// Parse a JSON array of row objects keyed by column name.
pub fn read_json(content: &str) -> Result<Vec<ResultRow>> {
    let rows: Vec<ResultRow> = serde_json::from_str(content).context("Invalid JSON result rows")?;
    for row in &rows {
        row.validate()?;
    }
    Ok(rows)
}
