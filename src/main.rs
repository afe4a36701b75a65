//! Compliance Analyzer - EU AI Act gap analysis dashboard
//!
//! A CLI tool that reads static assessment documents and renders the
//! executive summary, gap analysis, remediation roadmap and detailed
//! findings pages as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing or malformed data, bad config, write failure)
//!   2 - Data-quality problems found with --strict

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod repository;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, ReportFormat, CONFIG_FILE_NAME};
use report::{FindingsFilter, Page, ViewOptions};
use repository::{AssessmentRepository, DataFiles};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so that `[general] verbose` applies
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose))?;

    info!("Compliance Analyzer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard generation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .compliance.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the data directory, file names, start year and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the rendered report can be piped from stdout.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build and write the requested pages. Returns the exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    let repo = AssessmentRepository::new(config.data.dir.clone())
        .with_files(DataFiles::from(&config.data));
    info!("Reading assessment data from {}", repo.data_dir().display());

    let pages = args.page.pages();

    // The cross-check needs the gap analysis, which only the roadmap page can do without
    let mut clean = true;
    if pages.iter().any(|page| *page != Page::RemediationRoadmap) {
        let quality = analysis::check_data_quality(&repo.load_gap_analysis()?);
        if !quality.is_clean() {
            warn!(
                "Data-quality check found {} problem(s)",
                quality.warnings.len()
            );
            clean = false;
        }
    }

    let options = ViewOptions {
        filter: FindingsFilter::parse(&args.status, &args.severity, &args.category),
        start_year: config.roadmap.start_year,
        include_legal_warning: config.report.include_legal_warning,
    };

    let views = pages
        .iter()
        .map(|page| report::build_page(&repo, *page, &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let output = match config.report.format {
        ReportFormat::Json => report::generate_json_report(&views)?,
        ReportFormat::Markdown => report::generate_markdown_report(&views),
    };

    match config.general.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    if args.strict && !clean {
        eprintln!("\n⛔ Data-quality problems found. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Where the configuration came from, logged once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    DefaultFileInvalid(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::DefaultFileInvalid(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((
            Config::default(),
            ConfigSource::DefaultFileInvalid(format!("{:#}", e)),
        )),
    }
}
