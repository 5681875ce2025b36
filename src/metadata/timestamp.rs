//! Capture timestamp parsing and formatting

use super::tags::{TAG_DATE_TIME_ORIGINAL, TagMap, TagValue};
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

/// EXIF date convention: colons in the date part
pub const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
/// Canonical output form
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Form of the default used when no capture time is available
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an EXIF datetime string: "YYYY:MM:DD HH:MM:SS"
pub fn parse_exif_datetime(s: &str) -> Result<NaiveDateTime> {
    // Some writers pad with NULs or spaces
    let trimmed = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    NaiveDateTime::parse_from_str(trimmed, EXIF_FORMAT).map_err(|e| Error::TimestampParse {
        value: s.to_string(),
        message: e.to_string(),
    })
}

pub fn format_canonical(datetime: &NaiveDateTime) -> String {
    datetime.format(CANONICAL_FORMAT).to_string()
}

/// Default `captured_at` value for a given processing date
pub fn default_date(today: NaiveDate) -> String {
    today.format(DEFAULT_DATE_FORMAT).to_string()
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Decode DateTimeOriginal from the tag dictionary
pub fn decode_captured_at(tags: &TagMap) -> Result<NaiveDateTime> {
    match tags.get(&TAG_DATE_TIME_ORIGINAL) {
        Some(TagValue::Ascii(s)) => parse_exif_datetime(s),
        Some(other) => Err(Error::TimestampParse {
            value: format!("{other:?}"),
            message: "DateTimeOriginal is not a string".to_string(),
        }),
        None => Err(Error::TimestampMissing),
    }
}
