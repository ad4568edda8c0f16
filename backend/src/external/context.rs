//! Request context derived from a parcel for the upstream services
//!
//! The upstream contracts expect weather and soil readings the dashboard does
//! not hold. They are synthesized deterministically from the crop type and
//! the stress level.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::{Parcel, PriorityTier};

/// Days since irrigation assumed when a parcel has never been irrigated
pub const DEFAULT_DAYS_SINCE_IRRIGATION: i64 = 3;

/// Growth stage assumed when none is recorded
pub const DEFAULT_GROWTH_STAGE: &str = "croissance";

/// Crop assumed when a parcel has no crop type
pub const DEFAULT_CROP: &str = "Ble";

/// Context shared by every upstream request for one parcel
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelContext {
    pub crop_type: String,
    pub area_ha: Decimal,
    pub stress_level: Decimal,
    pub growth_stage: String,
    pub days_since_irrigation: i64,
    pub priority: PriorityTier,
}

impl ParcelContext {
    /// Derive the context of a parcel at a given instant
    pub fn derive(parcel: &Parcel, now: DateTime<Utc>) -> Self {
        let crop_type = if parcel.crop_type.trim().is_empty() {
            DEFAULT_CROP.to_string()
        } else {
            parcel.crop_type.clone()
        };

        Self {
            crop_type,
            area_ha: parcel.area_ha,
            stress_level: parcel.stress_level,
            growth_stage: DEFAULT_GROWTH_STAGE.to_string(),
            days_since_irrigation: days_since(parcel.last_irrigation, now),
            priority: PriorityTier::from_stress(parcel.stress_level),
        }
    }

    /// Stress level as a float for the wire payloads
    pub fn stress(&self) -> f64 {
        self.stress_level.to_f64().unwrap_or(0.0)
    }

    pub fn area(&self) -> f64 {
        self.area_ha.to_f64().unwrap_or(0.0)
    }

    pub fn crop_profile(&self) -> CropProfile {
        CropProfile::for_crop(&self.crop_type)
    }

    /// Synthetic soil moisture (%): 70 at no stress, floored at 10
    pub fn soil_moisture(&self) -> f64 {
        (70.0 - self.stress() * 60.0).max(10.0)
    }

    /// Expected precipitation (mm); dry when stress is above 0.6
    pub fn expected_precipitation_mm(&self) -> f64 {
        if self.stress() > 0.6 {
            0.0
        } else {
            2.5
        }
    }

    /// Probability of rain tomorrow
    pub fn rain_probability(&self) -> f64 {
        if self.stress() > 0.6 {
            0.05
        } else {
            0.15
        }
    }
}

/// Whole days elapsed since the last irrigation
pub fn days_since(last_irrigation: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match last_irrigation {
        Some(at) => (now - at).num_days().max(0),
        None => DEFAULT_DAYS_SINCE_IRRIGATION,
    }
}

/// Sensor identifier used by the water forecast service for a parcel.
///
/// Placeholder naming convention until sensors are linked to parcels.
pub fn sensor_id_for_parcel(parcel_id: i32) -> String {
    format!("sensor_p{}", parcel_id)
}

/// Baseline climate needs of a crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProfile {
    pub base_temperature_c: f64,
    pub base_humidity_pct: f64,
    pub base_et0_mm: f64,
}

impl CropProfile {
    pub fn for_crop(crop: &str) -> Self {
        let (base_temperature_c, base_humidity_pct, base_et0_mm) = if crop.contains("Tomate") {
            (28.0, 65.0, 5.5)
        } else if crop.contains("Maïs") {
            (26.0, 55.0, 5.0)
        } else if crop.contains("Pomme") {
            (22.0, 60.0, 4.5)
        } else {
            (24.0, 60.0, 4.5)
        };

        Self {
            base_temperature_c,
            base_humidity_pct,
            base_et0_mm,
        }
    }
}
