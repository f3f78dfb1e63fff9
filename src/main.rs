//! CLI entry point for the Student Performance Analyzer.
//!
//! Provides subcommands for generating sample data, previewing the cleaned
//! dataset, printing summaries and statistics, and exporting every artifact
//! in one run. Tables and reports go to stdout; logs go to stderr and the
//! JSON log file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use student_analyzer::{
    config::AnalyzerConfig,
    dashboard::{DashboardData, render_svg},
    output::{
        write_cleaned_csv, write_json_report, write_subject_stats_csv, write_summary_csv,
        write_text_report,
    },
    pipeline::{AnalysisRun, Pipeline},
    report::{render_preview, render_subject_stats, render_summary, render_text},
    sample::ensure_sample_data,
};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "student_analyzer")]
#[command(about = "Clean, aggregate and grade per-subject student scores", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in sample dataset if it does not exist yet
    Sample {
        /// Where to write the sample CSV (defaults to the configured input)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
    /// Show the first rows of the cleaned dataset
    Preview {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 10)]
        rows: usize,
    },
    /// Show the per-student summary table
    Summary {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show per-subject statistics
    Stats {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the narrative class report
    Report {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How many top and bottom performers to list
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Render the dashboard SVG
    Dashboard {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run the full pipeline and export every artifact
    Analyze {
        /// Input CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// How many top and bottom performers to list
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Skip rendering the dashboard
        #[arg(long, default_value_t = false)]
        no_dashboard: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/student_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("student_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    match cli.command {
        Commands::Sample { path } => {
            let path = path.unwrap_or_else(|| config.input.clone());
            if !ensure_sample_data(&path)? {
                info!(path = %path.display(), "Sample dataset already exists");
            }
        }
        Commands::Preview { input, rows } => {
            let run = load_run(&config, input)?;
            if run.dataset.is_empty() {
                warn!("No clean rows to preview");
            }
            let shown = &run.dataset.records[..rows.min(run.dataset.len())];
            print!("{}", render_preview(shown));
        }
        Commands::Summary { input } => {
            let run = load_run(&config, input)?;
            let distribution = run.engine().grade_distribution(run.registry.profiles());
            print!("{}", render_summary(&run.summary_table(), &distribution));
        }
        Commands::Stats { input } => {
            let run = load_run(&config, input)?;
            print!("{}", render_subject_stats(&run.subject_statistics()));
        }
        Commands::Report { input, top_n } => {
            if let Some(n) = top_n {
                config.top_n = n;
            }
            let run = load_run(&config, input)?;
            print!("{}", render_text(&run.narrative_summary()));
        }
        Commands::Dashboard { input, output_dir } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let run = load_run(&config, input)?;
            export_dashboard(&config, &run)?;
        }
        Commands::Analyze {
            input,
            output_dir,
            top_n,
            no_dashboard,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(n) = top_n {
                config.top_n = n;
            }
            let run = load_run(&config, input)?;
            export_all(&config, &run)?;
            if !no_dashboard {
                export_dashboard(&config, &run)?;
            }
            info!(output_dir = %config.output_dir.display(), "Quick run completed");
        }
    }

    Ok(())
}

/// Runs the pipeline over `input`, or over the configured input. The
/// configured input is seeded with sample data if it does not exist.
fn load_run(config: &AnalyzerConfig, input: Option<PathBuf>) -> Result<AnalysisRun> {
    let path = match input {
        Some(path) => path,
        None => {
            ensure_sample_data(&config.input)?;
            config.input.clone()
        }
    };
    Ok(Pipeline::new(config).run(&path)?)
}

#[tracing::instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
fn export_all(config: &AnalyzerConfig, run: &AnalysisRun) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)?;

    write_cleaned_csv(&config.cleaned_path(), &run.dataset)?;

    let summary = run.summary_table();
    if summary.is_empty() {
        warn!("No students to summarize");
    }
    write_summary_csv(&config.summary_path(), &summary)?;
    write_subject_stats_csv(&config.subject_stats_path(), &run.subject_statistics())?;

    let narrative = run.narrative_summary();
    write_text_report(&config.report_path(), &narrative)?;
    write_json_report(&config.report_json_path(), &narrative)?;
    Ok(())
}

fn export_dashboard(config: &AnalyzerConfig, run: &AnalysisRun) -> Result<()> {
    let data = DashboardData::new(
        &run.summary_table(),
        &run.subject_statistics(),
        run.engine().scale(),
    );
    if data.is_empty() {
        warn!("No summary data to plot, skipping dashboard");
        return Ok(());
    }
    render_svg(&config.dashboard_path(), &data)
}
