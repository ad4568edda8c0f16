//! Dashboard statistics

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Raw parcel aggregates as read from the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelAggregate {
    pub parcel_count: i64,
    pub total_area_ha: Decimal,
    pub critical_count: i64,
    pub moderate_count: i64,
    pub ok_count: i64,
    /// `None` when there are no parcels
    pub mean_stress: Option<Decimal>,
    /// Sum of water need (mm) times area (ha)
    pub water_demand: Decimal,
}

/// Raw alert aggregates as read from the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertAggregate {
    pub alert_count: i64,
    pub high_severity_count: i64,
}

/// Raw aggregates over pending recommendations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationAggregate {
    pub pending_count: i64,
    pub urgent_count: i64,
}

/// Global dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_parcelles: i64,
    pub superficie_totale: Decimal,
    pub parcelles_critiques: i64,
    pub parcelles_moderees: i64,
    pub parcelles_ok: i64,
    pub stress_moyen: Option<Decimal>,
    pub volume_eau_total_mm: Decimal,
    pub total_alertes: i64,
    pub alertes_elevees: i64,
    pub total_recommandations: i64,
    pub reco_urgentes: i64,
    pub timestamp: DateTime<Utc>,
}

impl DashboardStats {
    /// Combine the three independent reads. Mean stress and water demand are
    /// rounded to two decimals, midpoints away from zero as SQL `ROUND` does.
    pub fn combine(
        parcels: ParcelAggregate,
        alerts: AlertAggregate,
        recommendations: RecommendationAggregate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            total_parcelles: parcels.parcel_count,
            superficie_totale: parcels.total_area_ha,
            parcelles_critiques: parcels.critical_count,
            parcelles_moderees: parcels.moderate_count,
            parcelles_ok: parcels.ok_count,
            stress_moyen: parcels.mean_stress.map(round_2dp),
            volume_eau_total_mm: round_2dp(parcels.water_demand),
            total_alertes: alerts.alert_count,
            alertes_elevees: alerts.high_severity_count,
            total_recommandations: recommendations.pending_count,
            reco_urgentes: recommendations.urgent_count,
            timestamp,
        }
    }
}

fn round_2dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
