//! GeoJSON types used for map rendering

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ParcelSummary, StressCategory};

/// A GeoJSON FeatureCollection of parcels
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

/// A GeoJSON Feature describing one parcel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub struct Feature {
    pub id: i32,
    pub geometry: serde_json::Value,
    pub properties: ParcelProperties,
}

/// Map properties of a parcel feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParcelProperties {
    pub id: i32,
    pub nom: String,
    pub culture: String,
    pub superficie_ha: Decimal,
    pub date_semis: Option<NaiveDate>,
    pub stress_hydrique: StressCategory,
    pub niveau_stress: Decimal,
    pub besoin_eau_mm: Decimal,
    pub derniere_irrigation: Option<DateTime<Utc>>,
    pub nb_alertes: i64,
    pub nb_recommandations: i64,
}

impl From<ParcelSummary> for Feature {
    fn from(summary: ParcelSummary) -> Self {
        let p = summary.parcel;
        Feature {
            id: p.id,
            properties: ParcelProperties {
                id: p.id,
                nom: p.name,
                culture: p.crop_type,
                superficie_ha: p.area_ha,
                date_semis: p.sowing_date,
                stress_hydrique: p.stress_category,
                niveau_stress: p.stress_level,
                besoin_eau_mm: p.water_need_mm,
                derniere_irrigation: p.last_irrigation,
                nb_alertes: summary.alert_count,
                nb_recommandations: summary.pending_recommendation_count,
            },
            geometry: p.geometry,
        }
    }
}
