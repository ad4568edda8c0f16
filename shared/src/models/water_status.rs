//! Water status overview of every parcel

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Parcel, StressCategory};

/// Vegetation and water indices derived from the stress level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DroneIndices {
    /// `1 - stress / 2`
    pub ndvi: Decimal,
    /// `0.3 + (1 - stress) * 0.4`
    pub ndwi: Decimal,
}

impl DroneIndices {
    pub fn from_stress(stress_level: Decimal) -> Self {
        let half = Decimal::new(5, 1);
        let ndvi = Decimal::ONE - stress_level * half;
        let ndwi = Decimal::new(3, 1) + (Decimal::ONE - stress_level) * Decimal::new(4, 1);

        Self {
            ndvi: ndvi.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            ndwi: ndwi.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// One parcel in the water status overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterStatusEntry {
    pub id: i32,
    pub nom: String,
    pub culture: String,
    pub stress_hydrique: StressCategory,
    pub niveau_stress: Decimal,
    pub besoin_eau_mm: Decimal,
    pub derniere_irrigation: Option<DateTime<Utc>>,
    pub donnees_drone: DroneIndices,
}

impl From<&Parcel> for WaterStatusEntry {
    fn from(parcel: &Parcel) -> Self {
        Self {
            id: parcel.id,
            nom: parcel.name.clone(),
            culture: parcel.crop_type.clone(),
            stress_hydrique: parcel.stress_category,
            niveau_stress: parcel.stress_level,
            besoin_eau_mm: parcel.water_need_mm,
            derniere_irrigation: parcel.last_irrigation,
            donnees_drone: DroneIndices::from_stress(parcel.stress_level),
        }
    }
}

/// Parcel counts per stored stress category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StressBreakdown {
    pub critique: usize,
    pub modere: usize,
    pub ok: usize,
}

/// Water status of every parcel, most stressed first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterStatusReport {
    pub timestamp: DateTime<Utc>,
    pub count: usize,
    pub parcelles: Vec<WaterStatusEntry>,
    pub statistiques: StressBreakdown,
}

impl WaterStatusReport {
    /// Build the report. Parcels are ordered by stress level, highest first;
    /// equal levels keep their input order.
    pub fn build<'a, I>(parcels: I, timestamp: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Parcel>,
    {
        let mut parcelles: Vec<WaterStatusEntry> =
            parcels.into_iter().map(WaterStatusEntry::from).collect();
        parcelles.sort_by(|a, b| b.niveau_stress.cmp(&a.niveau_stress));

        let mut statistiques = StressBreakdown::default();
        for entry in &parcelles {
            match entry.stress_hydrique {
                StressCategory::Critical => statistiques.critique += 1,
                StressCategory::Moderate => statistiques.modere += 1,
                StressCategory::Ok => statistiques.ok += 1,
            }
        }

        Self {
            timestamp,
            count: parcelles.len(),
            parcelles,
            statistiques,
        }
    }
}
