//! Request body for the treatment-plan service
//!
//! Combines a disease label, farmer-supplied context and the photo's
//! [`GeoTimestamp`] into the JSON document the service expects.

use crate::error::{Error, Result};
use crate::metadata::GeoTimestamp;
use serde::{Deserialize, Serialize};

/// Smallest accepted parcel area in hectares
pub const MIN_AREA_HA: f64 = 0.1;
/// Largest accepted parcel area in hectares
pub const MAX_AREA_HA: f64 = 5.0;
const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// Farming mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FarmingMode {
    Conventional,
    #[default]
    Organic,
}

/// Disease severity as judged by the farmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    High,
}

/// JSON body posted to the treatment-plan service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRequest {
    /// Disease label from the diagnosis service
    pub cnn_label: String,
    pub mode: FarmingMode,
    pub severity: Severity,
    pub area_m2: f64,
    /// Capture time, `YYYY-MM-DD HH:MM:SS` or a bare date
    pub date_iso: String,
    /// `"latitude,longitude"`
    pub location: String,
}

impl TreatmentRequest {
    pub fn new(
        cnn_label: impl Into<String>,
        mode: FarmingMode,
        severity: Severity,
        area_ha: f64,
        geo: &GeoTimestamp,
    ) -> Result<Self> {
        let area_ha = validate_area(area_ha)?;

        Ok(Self {
            cnn_label: cnn_label.into(),
            mode,
            severity,
            area_m2: area_ha * SQUARE_METRES_PER_HECTARE,
            date_iso: geo.captured_at.clone(),
            // Debug formatting keeps the ".0" on whole numbers
            location: format!("{:?},{:?}", geo.latitude, geo.longitude),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Check a parcel area against the accepted hectare range
pub fn validate_area(area_ha: f64) -> Result<f64> {
    if !(MIN_AREA_HA..=MAX_AREA_HA).contains(&area_ha) {
        return Err(Error::InvalidArea {
            area_ha,
            min: MIN_AREA_HA,
            max: MAX_AREA_HA,
        });
    }
    Ok(area_ha)
}
