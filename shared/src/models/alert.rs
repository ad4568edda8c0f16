//! Plant disease alert models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ModelError, ParcelRef};

/// A disease detected on a parcel. Alerts are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseAlert {
    pub id: i32,
    #[serde(rename = "parcelle_id")]
    pub parcel_id: i32,
    #[serde(rename = "type_maladie")]
    pub disease_type: String,
    #[serde(rename = "severite")]
    pub severity: AlertSeverity,
    /// Detection confidence in [0, 1]
    #[serde(rename = "confiance")]
    pub confidence: Decimal,
    #[serde(rename = "date_detection")]
    pub detected_at: DateTime<Utc>,
    pub description: Option<String>,
}

/// Severity of a disease alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlertSeverity {
    #[serde(rename = "FAIBLE")]
    Low,
    #[serde(rename = "MOYENNE")]
    Medium,
    #[serde(rename = "ELEVEE")]
    High,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "FAIBLE",
            AlertSeverity::Medium => "MOYENNE",
            AlertSeverity::High => "ELEVEE",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAIBLE" => Ok(AlertSeverity::Low),
            "MOYENNE" => Ok(AlertSeverity::Medium),
            "ELEVEE" => Ok(AlertSeverity::High),
            other => Err(ModelError::UnknownValue {
                kind: "alert severity",
                value: other.to_string(),
            }),
        }
    }
}

/// Alert with the parcel it was raised on, for the global alert listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertListing {
    #[serde(flatten)]
    pub alert: DiseaseAlert,
    #[serde(rename = "parcelle")]
    pub parcel: ParcelRef,
}
