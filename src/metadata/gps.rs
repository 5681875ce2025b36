//! GPS block decoding: sexagesimal angles to decimal degrees

use super::tags::{
    GPS_LATITUDE, GPS_LATITUDE_REF, GPS_LONGITUDE, GPS_LONGITUDE_REF, TAG_GPS_INFO, TagMap,
    TagValue,
};
use crate::config::HemispherePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Degrees, minutes, seconds as read from the GPS block.
/// Components are not range checked; firmware occasionally writes minutes >= 60.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// `degrees + minutes / 60 + seconds / 3600`
    pub fn to_decimal(&self) -> f64 {
        self.degrees + self.minutes / 60.0 + self.seconds / 3600.0
    }
}

/// A coordinate pair in decimal degrees, both decoded from the same GPS block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Decode latitude and longitude from the GPS block of `tags`
pub fn decode_location(tags: &TagMap, hemisphere: HemispherePolicy) -> Result<GeoPoint> {
    let block = match tags.get(&TAG_GPS_INFO) {
        Some(TagValue::Block(block)) => block,
        Some(_) => {
            return Err(Error::GpsMalformed {
                tag: TAG_GPS_INFO,
                message: "GPSInfo is not a nested block".to_string(),
            });
        }
        None => return Err(Error::GpsMissing),
    };

    let mut latitude = read_dms(block, GPS_LATITUDE)?.to_decimal();
    let mut longitude = read_dms(block, GPS_LONGITUDE)?.to_decimal();

    if hemisphere == HemispherePolicy::Apply {
        if hemisphere_ref(block, GPS_LATITUDE_REF) == Some('S') {
            latitude = -latitude;
        }
        if hemisphere_ref(block, GPS_LONGITUDE_REF) == Some('W') {
            longitude = -longitude;
        }
    }

    trace!(latitude, longitude, "Decoded GPS block");
    Ok(GeoPoint {
        latitude,
        longitude,
    })
}

/// Read a (degrees, minutes, seconds) triple from a GPS sub-tag
pub fn read_dms(block: &TagMap, sub_tag: u16) -> Result<Dms> {
    let value = block
        .get(&sub_tag)
        .ok_or(Error::GpsSubTagMissing { sub_tag })?;

    let TagValue::Numbers(numbers) = value else {
        return Err(Error::GpsMalformed {
            tag: sub_tag,
            message: format!("expected a numeric triple, found {value:?}"),
        });
    };

    let [d, m, s] = numbers.as_slice() else {
        return Err(Error::GpsMalformed {
            tag: sub_tag,
            message: format!("expected 3 components, found {}", numbers.len()),
        });
    };

    let mut components = [0.0; 3];
    for (slot, number) in components.iter_mut().zip([d, m, s]) {
        *slot = match number.to_f64() {
            Some(v) if v >= 0.0 => v,
            Some(v) => {
                return Err(Error::GpsMalformed {
                    tag: sub_tag,
                    message: format!("negative component {v}"),
                });
            }
            None => {
                return Err(Error::GpsMalformed {
                    tag: sub_tag,
                    message: format!("non-finite component {number:?}"),
                });
            }
        };
    }

    let [degrees, minutes, seconds] = components;
    Ok(Dms::new(degrees, minutes, seconds))
}

fn hemisphere_ref(block: &TagMap, sub_tag: u16) -> Option<char> {
    match block.get(&sub_tag) {
        Some(TagValue::Ascii(s)) => s.trim().chars().next().map(|c| c.to_ascii_uppercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tags::Number;

    fn gps_tags(lat: TagValue, lon: TagValue) -> TagMap {
        let block = TagMap::from([(GPS_LATITUDE, lat), (GPS_LONGITUDE, lon)]);
        TagMap::from([(TAG_GPS_INFO, TagValue::Block(block))])
    }

    #[test]
    fn test_dms_to_decimal() {
        let paris_lat = Dms::new(48.0, 51.0, 30.0).to_decimal();
        assert!((paris_lat - 48.858_333_333).abs() < 1e-6);

        let paris_lon = Dms::new(2.0, 21.0, 5.0).to_decimal();
        assert!((paris_lon - 2.351_388_888).abs() < 1e-6);
    }

    #[test]
    fn test_dms_sweep() {
        for d in (0..180).step_by(7) {
            for m in (0..60).step_by(11) {
                for s in [0.0, 0.5, 17.25, 58.999] {
                    let got = Dms::new(d as f64, m as f64, s).to_decimal();
                    let expected = d as f64 + m as f64 / 60.0 + s / 3600.0;
                    assert!((got - expected).abs() < 1e-6, "{d} {m} {s}");
                }
            }
        }
    }

    #[test]
    fn test_dms_upper_boundary() {
        for d in [0.0, 10.0, 89.0, 179.0] {
            let v = Dms::new(d, 59.0, 59.0).to_decimal();
            assert!(v < d + 1.0);
            assert!(v > d + 0.98);
        }
    }

    #[test]
    fn test_dms_zero_is_exact() {
        assert_eq!(Dms::new(0.0, 0.0, 0.0).to_decimal(), 0.0);
    }

    #[test]
    fn test_decode_location() {
        let tags = gps_tags(
            TagValue::integers(&[48, 51, 30]),
            TagValue::integers(&[2, 21, 5]),
        );
        let point = decode_location(&tags, HemispherePolicy::Ignore).unwrap();
        assert!((point.latitude - 48.858_333).abs() < 1e-6);
        assert!((point.longitude - 2.351_388).abs() < 1e-6);
    }

    #[test]
    fn test_decode_location_rationals() {
        let tags = gps_tags(
            TagValue::Numbers(vec![
                Number::Ratio(45, 1),
                Number::Ratio(30, 1),
                Number::Ratio(1800, 100),
            ]),
            TagValue::integers(&[10, 0, 0]),
        );
        let point = decode_location(&tags, HemispherePolicy::Ignore).unwrap();
        assert!((point.latitude - 45.505).abs() < 1e-9);
        assert_eq!(point.longitude, 10.0);
    }

    #[test]
    fn test_hemisphere_ignored_by_default() {
        let mut tags = gps_tags(
            TagValue::integers(&[33, 52, 4]),
            TagValue::integers(&[151, 12, 26]),
        );
        if let Some(TagValue::Block(block)) = tags.get_mut(&TAG_GPS_INFO) {
            block.insert(GPS_LATITUDE_REF, TagValue::ascii("S"));
            block.insert(GPS_LONGITUDE_REF, TagValue::ascii("W"));
        }

        let ignored = decode_location(&tags, HemispherePolicy::default()).unwrap();
        assert!(ignored.latitude > 0.0);
        assert!(ignored.longitude > 0.0);

        let applied = decode_location(&tags, HemispherePolicy::Apply).unwrap();
        assert_eq!(applied.latitude, -ignored.latitude);
        assert_eq!(applied.longitude, -ignored.longitude);
    }

    #[test]
    fn test_missing_block() {
        let result = decode_location(&TagMap::new(), HemispherePolicy::Ignore);
        assert!(matches!(result, Err(Error::GpsMissing)));
    }

    #[test]
    fn test_block_with_wrong_type() {
        let tags = TagMap::from([(TAG_GPS_INFO, TagValue::integers(&[26]))]);
        let result = decode_location(&tags, HemispherePolicy::Ignore);
        assert!(matches!(
            result,
            Err(Error::GpsMalformed { tag: TAG_GPS_INFO, .. })
        ));
    }

    #[test]
    fn test_missing_longitude_sub_tag() {
        let block = TagMap::from([(GPS_LATITUDE, TagValue::integers(&[48, 51, 30]))]);
        let tags = TagMap::from([(TAG_GPS_INFO, TagValue::Block(block))]);
        let result = decode_location(&tags, HemispherePolicy::Ignore);
        assert!(matches!(result, Err(Error::GpsSubTagMissing { sub_tag: 4 })));
    }

    #[test]
    fn test_wrong_arity() {
        let tags = gps_tags(TagValue::integers(&[48, 51]), TagValue::integers(&[2, 21, 5]));
        let result = decode_location(&tags, HemispherePolicy::Ignore);
        assert!(matches!(result, Err(Error::GpsMalformed { tag: 2, .. })));
    }

    #[test]
    fn test_non_numeric_component() {
        let tags = gps_tags(TagValue::integers(&[48, 51, 30]), TagValue::ascii("2,21,5"));
        let result = decode_location(&tags, HemispherePolicy::Ignore);
        assert!(matches!(result, Err(Error::GpsMalformed { tag: 4, .. })));
    }

    #[test]
    fn test_zero_denominator() {
        let tags = gps_tags(
            TagValue::Numbers(vec![
                Number::Ratio(48, 1),
                Number::Ratio(51, 0),
                Number::Ratio(30, 1),
            ]),
            TagValue::integers(&[2, 21, 5]),
        );
        let result = decode_location(&tags, HemispherePolicy::Ignore);
        assert!(matches!(result, Err(Error::GpsMalformed { tag: 2, .. })));
    }
}
