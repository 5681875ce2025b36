//! The EXIF metadata dictionary
//!
//! Mirrors the flat "tag number -> value" view of an image's primary IFD,
//! with the GPS IFD folded in as a nested block under [`TAG_GPS_INFO`].

use crate::error::{Error, Result};
use exif::{Context, Exif, In, Reader, Value};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::{debug, trace};

/// GPSInfo: nested GPS block
pub const TAG_GPS_INFO: u16 = 34853;
/// DateTimeOriginal: capture timestamp
pub const TAG_DATE_TIME_ORIGINAL: u16 = 36867;

/// GPS block sub-tags
pub const GPS_LATITUDE_REF: u16 = 1;
pub const GPS_LATITUDE: u16 = 2;
pub const GPS_LONGITUDE_REF: u16 = 3;
pub const GPS_LONGITUDE: u16 = 4;

/// Metadata dictionary keyed by numeric tag identifier
pub type TagMap = BTreeMap<u16, TagValue>;

/// A single numeric component as stored in the file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Ratio(i64, i64),
    Float(f64),
}

impl Number {
    /// Finite value of this component, `None` for zero denominators or NaN/inf
    pub fn to_f64(self) -> Option<f64> {
        let value = match self {
            Number::Integer(v) => v as f64,
            Number::Ratio(_, 0) => return None,
            Number::Ratio(num, denom) => num as f64 / denom as f64,
            Number::Float(v) => v,
        };
        value.is_finite().then_some(value)
    }
}

/// Value of one tag in the dictionary
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// First string of an ASCII field
    Ascii(String),
    /// Integer, rational or floating point components
    Numbers(Vec<Number>),
    /// Nested dictionary (the GPS block)
    Block(TagMap),
    /// Opaque or unsupported field type
    Other,
}

impl TagValue {
    /// Convenience constructor for integral components
    pub fn integers(values: &[i64]) -> Self {
        TagValue::Numbers(values.iter().copied().map(Number::Integer).collect())
    }

    pub fn ascii(s: impl Into<String>) -> Self {
        TagValue::Ascii(s.into())
    }

    fn from_exif(value: &Value) -> Self {
        match value {
            Value::Ascii(vec) => vec
                .first()
                .map(|s| TagValue::Ascii(String::from_utf8_lossy(s).into_owned()))
                .unwrap_or(TagValue::Ascii(String::new())),
            Value::Byte(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::Short(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::Long(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::SByte(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::SShort(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::SLong(v) => ints(v.iter().map(|&x| i64::from(x))),
            Value::Rational(v) => TagValue::Numbers(
                v.iter()
                    .map(|r| Number::Ratio(i64::from(r.num), i64::from(r.denom)))
                    .collect(),
            ),
            Value::SRational(v) => TagValue::Numbers(
                v.iter()
                    .map(|r| Number::Ratio(i64::from(r.num), i64::from(r.denom)))
                    .collect(),
            ),
            Value::Float(v) => {
                TagValue::Numbers(v.iter().map(|&x| Number::Float(f64::from(x))).collect())
            }
            Value::Double(v) => TagValue::Numbers(v.iter().copied().map(Number::Float).collect()),
            _ => TagValue::Other,
        }
    }
}

fn ints(values: impl Iterator<Item = i64>) -> TagValue {
    TagValue::Numbers(values.map(Number::Integer).collect())
}

/// Decode an image container held in memory and build its tag dictionary
///
/// Any container `kamadak-exif` understands is accepted (JPEG, TIFF, HEIF,
/// PNG, WebP). Partially corrupt EXIF data still yields the fields that
/// could be read.
pub fn read_tags(bytes: &[u8]) -> Result<TagMap> {
    let mut reader = Reader::new();
    reader.continue_on_error(true);

    let mut cursor = Cursor::new(bytes);
    let exif = match reader.read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::PartialResult(partial)) => {
            let (exif, errors) = partial.into_inner();
            debug!(errors = errors.len(), "Using partially decoded EXIF data");
            exif
        }
        Err(exif::Error::NotFound(container)) => {
            trace!(container, "Container has no EXIF segment");
            return Err(Error::NoMetadata);
        }
        Err(e) => {
            return Err(Error::Undecodable {
                message: e.to_string(),
            });
        }
    };

    let tags = tag_map(&exif);
    if tags.is_empty() {
        return Err(Error::NoMetadata);
    }

    trace!(count = tags.len(), "Built EXIF tag dictionary");
    Ok(tags)
}

/// Flatten the primary IFD and nest GPS fields under [`TAG_GPS_INFO`]
fn tag_map(exif: &Exif) -> TagMap {
    let mut tags = TagMap::new();
    let mut gps = TagMap::new();

    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let number = field.tag.number();
        match field.tag.context() {
            Context::Gps => {
                gps.insert(number, TagValue::from_exif(&field.value));
            }
            Context::Tiff | Context::Exif => {
                // The GPS IFD pointer shares the GPSInfo tag number
                if number != TAG_GPS_INFO {
                    tags.insert(number, TagValue::from_exif(&field.value));
                }
            }
            _ => {}
        }
    }

    if !gps.is_empty() {
        tags.insert(TAG_GPS_INFO, TagValue::Block(gps));
    }

    tags
}
