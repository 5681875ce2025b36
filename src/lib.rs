//! Vitiscan - photo metadata for grape-leaf diagnosis
//!
//! This library provides the pieces that sit between a farmer's photo and
//! the remote diagnosis / treatment-plan services:
//! - EXIF GPS extraction with degrees/minutes/seconds to decimal conversion
//! - Capture timestamp normalization
//! - Treatment-plan request payloads
//! - Parallel batch scanning with Rayon

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod scan;

pub use cli::{Cli, OutputFormat};
pub use config::{Config, ConfigError, HemispherePolicy};
pub use error::{Error, Result};
pub use metadata::{ExtractOptions, Extraction, GeoPoint, GeoTimestamp, extract, extract_with};
pub use payload::{FarmingMode, Severity, TreatmentRequest};
pub use scan::{ScanRecord, ScanStatus, Scanner};
