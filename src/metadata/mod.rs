//! Photo metadata extraction
//!
//! Turns a raw image byte stream into a [`GeoTimestamp`]: decimal-degree
//! coordinates from the EXIF GPS block and a canonical capture timestamp.
//!
//! - [`extract`] never fails; missing or corrupt metadata maps to defaults
//! - [`extract_with`] returns an [`Extraction`] that keeps absent values as
//!   `None` and records every absorbed failure

#[cfg(test)]
pub(crate) mod fixtures;
pub mod gps;
pub mod tags;
pub mod timestamp;

pub use gps::{Dms, GeoPoint};
pub use tags::{TagMap, TagValue};

use crate::config::HemispherePolicy;
use crate::error::Error;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fully populated extraction result handed to the UI layer.
///
/// `(0.0, 0.0)` means "no location"; callers should not render a map for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTimestamp {
    pub longitude: f64,
    pub latitude: f64,
    /// `YYYY-MM-DD HH:MM:SS`, or the processing date `YYYY-MM-DD` when unknown
    pub captured_at: String,
}

impl GeoTimestamp {
    /// False for the `(0.0, 0.0)` sentinel
    pub fn has_location(&self) -> bool {
        !(self.longitude == 0.0 && self.latitude == 0.0)
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.has_location().then_some(GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// Options controlling extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub hemisphere: HemispherePolicy,
}

/// Extraction outcome with absent values kept explicit
#[derive(Debug, Default)]
pub struct Extraction {
    pub location: Option<GeoPoint>,
    pub captured_at: Option<NaiveDateTime>,
    /// Conditions absorbed while extracting, in the order they occurred
    pub issues: Vec<Error>,
}

impl Extraction {
    fn failed(issue: Error) -> Self {
        Self {
            issues: vec![issue],
            ..Self::default()
        }
    }

    /// Apply the boundary defaults: `0.0` coordinates and `today` as the date
    pub fn into_geo_timestamp(self, today: NaiveDate) -> GeoTimestamp {
        let (longitude, latitude) = self
            .location
            .map(|p| (p.longitude, p.latitude))
            .unwrap_or((0.0, 0.0));

        let captured_at = match self.captured_at {
            Some(dt) => timestamp::format_canonical(&dt),
            None => timestamp::default_date(today),
        };

        GeoTimestamp {
            longitude,
            latitude,
            captured_at,
        }
    }
}

/// Extract GPS coordinates and capture time from image bytes.
///
/// Always returns a populated value; see [`extract_with`] for diagnostics.
pub fn extract(image_bytes: &[u8]) -> GeoTimestamp {
    extract_with(image_bytes, &ExtractOptions::default()).into_geo_timestamp(timestamp::today())
}

/// Extract with options, keeping the absorbed failures
pub fn extract_with(image_bytes: &[u8], options: &ExtractOptions) -> Extraction {
    match tags::read_tags(image_bytes) {
        Ok(tags) => extract_from_tags(&tags, options),
        Err(e) => {
            debug!(error = %e, "No usable metadata, using defaults");
            Extraction::failed(e)
        }
    }
}

/// Run extraction against an already decoded tag dictionary.
///
/// GPS and timestamp are decoded independently; a failure in one never
/// discards the other.
pub fn extract_from_tags(tags: &TagMap, options: &ExtractOptions) -> Extraction {
    if tags.is_empty() {
        return Extraction::failed(Error::NoMetadata);
    }

    let mut extraction = Extraction::default();

    match gps::decode_location(tags, options.hemisphere) {
        Ok(point) => extraction.location = Some(point),
        Err(e) => {
            debug!(error = %e, "GPS unavailable");
            extraction.issues.push(e);
        }
    }

    match timestamp::decode_captured_at(tags) {
        Ok(dt) => extraction.captured_at = Some(dt),
        Err(e) => {
            debug!(error = %e, "Capture time unavailable");
            extraction.issues.push(e);
        }
    }

    extraction
}
