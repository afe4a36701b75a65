//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ReportFormat;
use crate::report::Page;
use clap::Parser;
use std::path::PathBuf;

/// Compliance Analyzer - EU AI Act gap analysis dashboard
///
/// Renders the executive summary, gap analysis, remediation roadmap and
/// detailed findings pages from static assessment documents.
///
/// Examples:
///   compliance-analyzer
///   compliance-analyzer --page gap-analysis --category "Governance"
///   compliance-analyzer --page detailed-findings --status Partial --severity High
///   compliance-analyzer --format json --output dashboard.json
///   compliance-analyzer --strict
///   compliance-analyzer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing gap_analysis.json, requirements.json and roadmap.json
    #[arg(short, long, value_name = "DIR", env = "COMPLIANCE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Page to render
    #[arg(short, long, default_value = "all", value_name = "PAGE")]
    pub page: PageSelection,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path. Prints to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only show findings with this status ("All" for no filter)
    #[arg(long, default_value = "All", value_name = "STATUS")]
    pub status: String,

    /// Only show findings with this severity ("All" for no filter)
    #[arg(long, default_value = "All", value_name = "SEVERITY")]
    pub severity: String,

    /// Only show requirements in this category ("All" for no filter)
    #[arg(long, default_value = "All", value_name = "CATEGORY")]
    pub category: String,

    /// Year in which remediation phase 1 starts
    #[arg(long, value_name = "YEAR")]
    pub start_year: Option<i32>,

    /// Omit the legal exposure warning from the executive summary
    #[arg(long)]
    pub no_legal_warning: bool,

    /// Exit with code 2 when the data-quality cross-check finds problems
    #[arg(long)]
    pub strict: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .compliance.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .compliance.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Which page(s) to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageSelection {
    /// Every page, in navigation order
    #[default]
    All,
    ExecutiveSummary,
    GapAnalysis,
    RemediationRoadmap,
    DetailedFindings,
}

impl PageSelection {
    /// The pages this selection expands to.
    pub fn pages(self) -> Vec<Page> {
        match self {
            PageSelection::All => Page::ALL.to_vec(),
            PageSelection::ExecutiveSummary => vec![Page::ExecutiveSummary],
            PageSelection::GapAnalysis => vec![Page::GapAnalysis],
            PageSelection::RemediationRoadmap => vec![Page::RemediationRoadmap],
            PageSelection::DetailedFindings => vec![Page::DetailedFindings],
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for (flag, value) in [
            ("--status", &self.status),
            ("--severity", &self.severity),
            ("--category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty (use \"All\" for no filter)", flag));
            }
        }

        if let Some(year) = self.start_year {
            if !(1..=9999).contains(&year) {
                return Err("Start year must be between 1 and 9999".to_string());
            }
        }

        // Validate data directory if provided
        if let Some(ref dir) = self.data_dir {
            if !dir.exists() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Data path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file; `--quiet`
    /// wins over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data_dir: None,
            page: PageSelection::All,
            format: None,
            output: None,
            status: "All".to_string(),
            severity: "All".to_string(),
            category: "All".to_string(),
            start_year: None,
            no_legal_warning: false,
            strict: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_page_and_filters() {
        let args = Args::try_parse_from([
            "compliance-analyzer",
            "--page",
            "detailed-findings",
            "--status",
            "Partial",
            "--severity",
            "High",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.page, PageSelection::DetailedFindings);
        assert_eq!(args.status, "Partial");
        assert_eq!(args.severity, "High");
        assert_eq!(args.category, "All");
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_all_pages_in_navigation_order() {
        assert_eq!(PageSelection::All.pages(), Page::ALL.to_vec());
        assert_eq!(PageSelection::GapAnalysis.pages(), vec![Page::GapAnalysis]);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_dir() {
        let mut args = make_args();
        args.data_dir = Some(PathBuf::from("/definitely/not/here"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_filter() {
        let mut args = make_args();
        args.severity = "  ".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_raises_log_level() {
        let mut config: crate::config::Config =
            toml::from_str("[general]\nverbose = true\n").unwrap();
        let mut args = make_args();
        config.merge_with_args(&args);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::ERROR);
    }
}
