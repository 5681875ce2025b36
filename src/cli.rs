//! CLI argument parsing with clap

use crate::config::{Config, HemispherePolicy};
use crate::error::Result;
use crate::payload::{self, FarmingMode, Severity};
use clap::Parser;
use std::path::PathBuf;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per image
    #[default]
    Text,
    /// A JSON array of records
    Json,
}

/// Vitiscan - grape-leaf photo metadata extraction
///
/// Reads EXIF GPS coordinates and capture time from photos and, when a
/// disease label is given, prints the treatment-plan request that would be
/// sent for each photo.
#[derive(Parser, Debug)]
#[command(name = "vitiscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Image files or directories to scan
    pub inputs: Vec<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments and environment variables override file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Base URL of the diagnosis service
    #[arg(long, env = "VITISCAN_API_DIAGNO")]
    pub api_diagno: Option<String>,

    /// Base URL of the treatment-plan service
    #[arg(long, env = "VITISCAN_API_SOLUTIONS")]
    pub api_solutions: Option<String>,

    /// Show outbound request payloads (env accepts 1/0, true/false, yes/no)
    #[arg(
        long,
        env = "VITISCAN_DEBUG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: bool,

    /// GPS hemisphere handling
    #[arg(long, value_enum)]
    pub hemisphere: Option<HemispherePolicy>,

    /// Number of threads for parallel extraction (0 = auto)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disease label; when set, a treatment request is built per image
    #[arg(short, long)]
    pub label: Option<String>,

    /// Farming mode for treatment requests
    #[arg(long, value_enum, default_value_t = FarmingMode::Organic)]
    pub mode: FarmingMode,

    /// Severity for treatment requests
    #[arg(long, value_enum, default_value_t = Severity::Low)]
    pub severity: Severity,

    /// Parcel area in hectares for treatment requests
    #[arg(long, default_value_t = 0.5)]
    pub area_ha: f64,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub sample_config: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref api_diagno) = self.api_diagno {
            config.api_diagno = api_diagno.clone();
        }
        if let Some(ref api_solutions) = self.api_solutions {
            config.api_solutions = api_solutions.clone();
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(hemisphere) = self.hemisphere {
            config.hemisphere = hemisphere;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.verbose {
            config.verbose = true;
        }

        config.normalized()
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }

    /// Validated parcel area when treatment requests were asked for
    pub fn treatment_area(&self) -> Result<Option<f64>> {
        match self.label {
            Some(_) => payload::validate_area(self.area_ha).map(Some),
            None => Ok(None),
        }
    }
}
