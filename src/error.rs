//! Error types for vitiscan
//!
//! Extraction never surfaces these to callers of [`crate::metadata::extract`];
//! they are collected as diagnostics and mapped to default values.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vitiscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vitiscan
#[derive(Error, Debug)]
pub enum Error {
    #[error("Undecodable image: {message}")]
    Undecodable { message: String },

    #[error("No EXIF metadata present")]
    NoMetadata,

    #[error("GPS block not found")]
    GpsMissing,

    #[error("GPS sub-tag {sub_tag} missing from GPS block")]
    GpsSubTagMissing { sub_tag: u16 },

    #[error("GPS tag {tag} is malformed: {message}")]
    GpsMalformed { tag: u16, message: String },

    #[error("Capture timestamp tag not found")]
    TimestampMissing,

    #[error("Failed to parse timestamp {value:?}: {message}")]
    TimestampParse { value: String, message: String },

    #[error("Area {area_ha} ha is outside the accepted range {min}..={max} ha")]
    InvalidArea { area_ha: f64, min: f64, max: f64 },

    #[error("Failed to read image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    /// Whether this condition only affects the GPS half of the result
    pub fn is_gps_issue(&self) -> bool {
        matches!(
            self,
            Error::GpsMissing | Error::GpsSubTagMissing { .. } | Error::GpsMalformed { .. }
        )
    }

    /// Whether this condition only affects the timestamp half of the result
    pub fn is_timestamp_issue(&self) -> bool {
        matches!(self, Error::TimestampMissing | Error::TimestampParse { .. })
    }
}
