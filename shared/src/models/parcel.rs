//! Parcel models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ModelError;

/// A georeferenced unit of cultivated land
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parcel {
    pub id: i32,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "culture")]
    pub crop_type: String,
    #[serde(rename = "superficie_ha")]
    pub area_ha: Decimal,
    #[serde(rename = "date_semis")]
    pub sowing_date: Option<NaiveDate>,
    /// Normalized water-stress level in [0, 1]
    #[serde(rename = "niveau_stress")]
    pub stress_level: Decimal,
    #[serde(rename = "stress_hydrique")]
    pub stress_category: StressCategory,
    #[serde(rename = "besoin_eau_mm")]
    pub water_need_mm: Decimal,
    #[serde(rename = "derniere_irrigation")]
    pub last_irrigation: Option<DateTime<Utc>>,
    /// Polygon geometry as a GeoJSON object
    pub geometry: serde_json::Value,
}

impl Parcel {
    /// Parcels loaded from the store always carry a positive identifier
    pub fn has_identifier(&self) -> bool {
        self.id > 0
    }

    /// Compact reference used when embedding a parcel in another listing
    pub fn to_ref(&self) -> ParcelRef {
        ParcelRef {
            id: self.id,
            name: self.name.clone(),
            crop_type: self.crop_type.clone(),
            area_ha: Some(self.area_ha),
        }
    }
}

/// Water-stress category, computed upstream of this platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StressCategory {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "MODERE")]
    Moderate,
    #[serde(rename = "CRITIQUE")]
    Critical,
}

impl StressCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressCategory::Ok => "OK",
            StressCategory::Moderate => "MODERE",
            StressCategory::Critical => "CRITIQUE",
        }
    }
}

impl std::fmt::Display for StressCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StressCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(StressCategory::Ok),
            "MODERE" => Ok(StressCategory::Moderate),
            "CRITIQUE" => Ok(StressCategory::Critical),
            other => Err(ModelError::UnknownValue {
                kind: "stress category",
                value: other.to_string(),
            }),
        }
    }
}

/// Compact parcel reference embedded in alert and recommendation listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParcelRef {
    pub id: i32,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "culture")]
    pub crop_type: String,
    #[serde(rename = "superficie_ha", skip_serializing_if = "Option::is_none")]
    pub area_ha: Option<Decimal>,
}

/// A parcel together with its pending workload counts
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelSummary {
    pub parcel: Parcel,
    pub alert_count: i64,
    pub pending_recommendation_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_category_round_trip_labels() {
        for category in [
            StressCategory::Ok,
            StressCategory::Moderate,
            StressCategory::Critical,
        ] {
            assert_eq!(category.as_str().parse::<StressCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_stress_category() {
        let err = "SEVERE".parse::<StressCategory>().unwrap_err();
        assert!(err.to_string().contains("SEVERE"));
    }
}
