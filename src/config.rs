//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.compliance.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".compliance.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where the assessment documents live.
    #[serde(default)]
    pub data: DataConfig,

    /// Roadmap scheduling settings.
    #[serde(default)]
    pub roadmap: RoadmapConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. Stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Location of the three source documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory containing the documents.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_gap_analysis")]
    pub gap_analysis: String,

    #[serde(default = "default_requirements")]
    pub requirements: String,

    #[serde(default = "default_roadmap")]
    pub roadmap: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            gap_analysis: default_gap_analysis(),
            requirements: default_requirements(),
            roadmap: default_roadmap(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_gap_analysis() -> String {
    "gap_analysis.json".to_string()
}

fn default_requirements() -> String {
    "requirements.json".to_string()
}

fn default_roadmap() -> String {
    "roadmap.json".to_string()
}

/// Roadmap scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// Year in which phase 1 starts.
    #[serde(default = "default_start_year")]
    pub start_year: i32,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
        }
    }
}

fn default_start_year() -> i32 {
    crate::analysis::DEFAULT_START_YEAR
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Include the legal exposure warning on the executive summary.
    #[serde(default = "default_true")]
    pub include_legal_warning: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            include_legal_warning: true,
        }
    }
}

/// Report format as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.data.dir = dir.clone();
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }

        if let Some(format) = args.format {
            self.report.format = format.into();
        }

        if let Some(year) = args.start_year {
            self.roadmap.start_year = year;
        }

        if args.no_legal_warning {
            self.report.include_legal_warning = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
