//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::InputArgs;
use crate::OutputArgs;
use crate::{charts, loader, render};
use anyhow::Context;
use modelcmp_core::config::{self, CompareConfig, OutputFormat};
use modelcmp_core::{
    NormalizedScores, RankedRow, generate_model_summary, identify_overall_best_model,
    normalized_scores,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUMMARY_FILE: &str = "model_summary";
const RANKING_FILE: &str = "model_ranking";

/// Rendered command output plus any files written alongside it.
#[derive(Debug, Default)]
pub struct Report {
    pub text: String,
    /// Printed to stderr so that `text` stays parseable as CSV.
    pub notes: Option<String>,
    pub written: Vec<PathBuf>,
}

/// JSON shape of `rank --explain`.
#[derive(Serialize)]
struct Explained<'a> {
    ranking: &'a [RankedRow],
    normalized: &'a [NormalizedScores],
}

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    workspace: &Path,
    config_file: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let report = match command {
        Commands::Config { action } => return handle_config(action, workspace, config_file),
        Commands::Summary { input, output } => {
            let config = effective_config(workspace, config_file, &output)?;
            summary_report(&input, &config, workspace)?
        }
        Commands::Rank {
            input,
            output,
            no_plot,
            explain,
            degenerate,
        } => {
            let mut config = effective_config(workspace, config_file, &output)?;
            if no_plot {
                config.output.charts = false;
            }
            if let Some(policy) = degenerate {
                config.ranking.degenerate_policy = policy;
            }
            rank_report(&input, &config, workspace, explain)?
        }
    };

    println!("{}", report.text.trim_end());
    if let Some(notes) = &report.notes {
        eprintln!("{}", notes.trim_end());
    }
    if !quiet {
        for path in &report.written {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Load layered config and apply the output flags on top.
fn effective_config(
    workspace: &Path,
    config_file: Option<&Path>,
    output: &OutputArgs,
) -> anyhow::Result<CompareConfig> {
    let mut config = config::load_config(Some(workspace), config_file)
        .context("Failed to load config")?;
    if let Some(format) = output.format {
        config.output.format = format;
    }
    if let Some(dir) = &output.output {
        config.output.dir = dir.clone();
    }
    if output.save {
        config.output.write_table = true;
    }
    debug!(?config, "Effective configuration");
    Ok(config)
}

/// Relative output directories are taken from the workspace.
fn output_dir(config: &CompareConfig, workspace: &Path) -> PathBuf {
    if config.output.dir.is_absolute() {
        config.output.dir.clone()
    } else {
        workspace.join(&config.output.dir)
    }
}

fn write_table(dir: &Path, stem: &str, config: &CompareConfig, text: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{stem}.{}", config.output.format.extension()));
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Stage one: best variant per model.
pub fn summary_report(input: &InputArgs, config: &CompareConfig, workspace: &Path) -> anyhow::Result<Report> {
    let tables = loader::load_tables(&input.files, !input.no_split)?;
    let summary = generate_model_summary(&tables)?;
    let text = render::summary(&summary, config.output.format, &config.display)?;

    let mut written = Vec::new();
    if config.output.write_table {
        let dir = output_dir(config, workspace);
        written.push(write_table(&dir, SUMMARY_FILE, config, &text)?);
    }
    Ok(Report {
        text,
        notes: None,
        written,
    })
}

/// Both stages: best variants, then the composite ranking and charts.
pub fn rank_report(
    input: &InputArgs,
    config: &CompareConfig,
    workspace: &Path,
    explain: bool,
) -> anyhow::Result<Report> {
    let tables = loader::load_tables(&input.files, !input.no_split)?;
    let summary = generate_model_summary(&tables)?;
    let ranked = identify_overall_best_model(&summary, &config.ranking)?;
    let format = config.output.format;
    let mut text = render::ranked(&ranked, &config.ranking.weights, format, &config.display)?;
    let mut notes = None;

    if explain {
        let scores = normalized_scores(&summary, config.ranking.degenerate_policy)?;
        match format {
            OutputFormat::Json => {
                text = serde_json::to_string_pretty(&Explained {
                    ranking: &ranked,
                    normalized: &scores,
                })?;
            }
            OutputFormat::Csv => {
                notes = Some(render::normalized(&scores, format, config.display.decimals)?);
            }
            OutputFormat::Table | OutputFormat::Markdown => {
                text.push_str("\n\n");
                text.push_str(&render::normalized(&scores, format, config.display.decimals)?);
            }
        }
    }

    let dir = output_dir(config, workspace);
    let mut written = Vec::new();
    if config.output.write_table {
        written.push(write_table(&dir, RANKING_FILE, config, &text)?);
    }
    if config.output.charts {
        written.extend(charts::render_all(&ranked, &config.charts, &dir)?);
    }
    Ok(Report {
        text,
        notes,
        written,
    })
}

fn handle_config(action: ConfigAction, workspace: &Path, config_file: Option<&Path>) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let (path, created) = init_config(workspace)?;
            if created {
                println!("Created default configuration at: {}", path.display());
            } else {
                println!("Configuration file already exists at: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = config::load_config(Some(workspace), config_file)
                .context("Failed to load config")?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Write the default config into the workspace unless one is already there.
fn init_config(workspace: &Path) -> anyhow::Result<(PathBuf, bool)> {
    let path = config::workspace_config_path(workspace);
    if path.exists() {
        return Ok((path, false));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(&CompareConfig::default())?;
    std::fs::write(&path, toml_str)?;
    Ok((path, true))
}
