//! modelcmp CLI — compare model evaluation results from the terminal.
//!
//! Reads per-model result tables (CSV or JSON), selects each model's best
//! variant, ranks the models by composite score and renders tables and charts.

mod charts;
mod commands;
mod loader;
mod render;

use clap::Parser;
use modelcmp_core::DegeneratePolicy;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// modelcmp: pick the best variant of each model and rank the models
#[derive(Parser, Debug)]
#[command(name = "modelcmp", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (for `.modelcmp/config.toml`)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Select the best variant of each model and flag the cheapest
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Select best variants, then rank models by composite score
    Rank {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Skip chart rendering
        #[arg(long)]
        no_plot: bool,

        /// Also print the normalized per-metric values behind each score
        #[arg(long)]
        explain: bool,

        /// Value used when all models tie on a metric: zero, half, error
        #[arg(long, value_parser = parse_policy)]
        degenerate: Option<DegeneratePolicy>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Result files (.csv or .json), one or more models each
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Treat every file as a single model table instead of splitting on `Model`
    #[arg(long)]
    no_split: bool,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Output format: table, csv, json, markdown
    #[arg(short, long, value_parser = parse_format)]
    format: Option<modelcmp_core::config::OutputFormat>,

    /// Directory for written tables and charts
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the rendered table into the output directory
    #[arg(long)]
    save: bool,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

fn parse_policy(s: &str) -> Result<DegeneratePolicy, String> {
    match s {
        "zero" => Ok(DegeneratePolicy::Zero),
        "half" => Ok(DegeneratePolicy::Half),
        "error" => Ok(DegeneratePolicy::Error),
        other => Err(format!("unknown policy '{other}', expected zero, half or error")),
    }
}

fn parse_format(s: &str) -> Result<modelcmp_core::config::OutputFormat, String> {
    use modelcmp_core::config::OutputFormat;
    match s {
        "table" => Ok(OutputFormat::Table),
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        other => Err(format!(
            "unknown format '{other}', expected table, csv, json or markdown"
        )),
    }
}

/// Human-readable stderr layer plus a daily-rolling JSON log file.
fn init_tracing(verbose: u8, quiet: bool) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "modelcmp", "modelcmp")
        .map(|d| d.data_dir().join("logs"));
    let (json_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let file_appender = tracing_appender::rolling::daily(&dir, "modelcmp.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose, cli.quiet);

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.config.as_deref(), cli.quiet)
}
