//! Configuration types for vitiscan
//!
//! A single [`Config`] value is built at startup (TOML file, then CLI and
//! environment overrides) and passed to whoever needs it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Whether GPS hemisphere references (N/S, E/W) are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HemispherePolicy {
    /// Treat every coordinate as north/east positive
    #[default]
    Ignore,
    /// Negate latitude for `S` and longitude for `W`
    Apply,
}

/// Configuration for vitiscan
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the diagnosis (image classification) service
    pub api_diagno: String,

    /// Base URL of the treatment-plan service
    pub api_solutions: String,

    /// Debug mode: show outbound request payloads
    pub debug: bool,

    /// Hemisphere handling for GPS coordinates
    pub hemisphere: HemispherePolicy,

    /// Directories to exclude from scanning (absolute paths or folder names)
    pub exclude_dirs: Vec<PathBuf>,

    /// Number of threads for parallel extraction (0 = auto)
    pub threads: usize,

    /// Verbose output
    pub verbose: bool,

    /// File extensions considered images when scanning directories
    pub image_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_diagno: "https://localhost:4000".into(),
            api_solutions: "https://localhost:9000".into(),
            debug: false,
            hemisphere: HemispherePolicy::default(),
            exclude_dirs: vec![],
            threads: 0, // Auto-detect
            verbose: false,
            image_extensions: vec![
                "jpg".into(), "jpeg".into(), "png".into(), "webp".into(),
                "heic".into(), "heif".into(), "avif".into(), "tiff".into(), "tif".into(),
            ],
        }
    }
}

impl Config {
    /// Check if a file extension is a supported image format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Strip stray quotes and trailing slashes from endpoint URLs
    pub fn normalized(mut self) -> Self {
        self.api_diagno = normalize_url(&self.api_diagno);
        self.api_solutions = normalize_url(&self.api_solutions);
        self
    }

    /// Diagnosis endpoint (multipart image upload)
    pub fn diagnosis_url(&self) -> String {
        format!("{}/diagno", self.api_diagno)
    }

    /// Disease label catalogue endpoint
    pub fn diseases_url(&self) -> String {
        format!("{}/diseases", self.api_diagno)
    }

    /// Treatment-plan endpoint (JSON body, see [`crate::payload::TreatmentRequest`])
    pub fn solutions_url(&self) -> String {
        format!("{}/solutions", self.api_solutions)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config.normalized())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Vitiscan Configuration File
# This file uses TOML format (https://toml.io)

# Diagnosis service (image classification)
api_diagno = "https://localhost:4000"

# Treatment-plan service
api_solutions = "https://localhost:9000"

# Print outbound request payloads
debug = false

# GPS hemisphere handling: "ignore" or "apply"
# - ignore: coordinates are always north/east positive
# - apply: southern latitudes and western longitudes are negated
hemisphere = "ignore"

# Directories to exclude when scanning folders
exclude_dirs = [".thumbnails", "@eaDir"]

# Number of threads for parallel extraction (0 = auto-detect)
threads = 0

# Verbose output
verbose = false

image_extensions = ["jpg", "jpeg", "png", "webp", "heic", "heif", "avif", "tiff", "tif"]
"#
        .to_string()
    }
}

fn normalize_url(url: &str) -> String {
    url.replace('"', "").trim().trim_end_matches('/').to_string()
}

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
