//! In-memory parcel store
//!
//! Holds the same three tables as the database and computes the same
//! aggregates. Used by the test suites and for running without PostGIS.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use shared::{
    AlertAggregate, AlertListing, AlertSeverity, DiseaseAlert, IrrigationRecommendation, Parcel,
    ParcelAggregate, ParcelRef, ParcelSummary, RecommendationAggregate, RecommendationListing,
    RecommendationPriority, StressCategory,
};

use super::ParcelStore;
use crate::error::AppResult;

#[derive(Default)]
struct Tables {
    parcels: BTreeMap<i32, Parcel>,
    alerts: Vec<DiseaseAlert>,
    recommendations: Vec<IrrigationRecommendation>,
}

#[derive(Default)]
pub struct MemoryParcelStore {
    tables: RwLock<Tables>,
}

impl MemoryParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_parcel(&self, parcel: Parcel) {
        self.tables.write().await.parcels.insert(parcel.id, parcel);
    }

    pub async fn insert_alert(&self, alert: DiseaseAlert) {
        self.tables.write().await.alerts.push(alert);
    }

    pub async fn insert_recommendation(&self, recommendation: IrrigationRecommendation) {
        self.tables.write().await.recommendations.push(recommendation);
    }
}

impl Tables {
    fn parcel_ref(&self, parcel_id: i32) -> Option<ParcelRef> {
        self.parcels.get(&parcel_id).map(Parcel::to_ref)
    }
}

#[async_trait]
impl ParcelStore for MemoryParcelStore {
    async fn parcel_summaries(&self) -> AppResult<Vec<ParcelSummary>> {
        let tables = self.tables.read().await;

        let summaries = tables
            .parcels
            .values()
            .map(|parcel| ParcelSummary {
                parcel: parcel.clone(),
                alert_count: tables
                    .alerts
                    .iter()
                    .filter(|a| a.parcel_id == parcel.id)
                    .count() as i64,
                pending_recommendation_count: tables
                    .recommendations
                    .iter()
                    .filter(|r| r.parcel_id == parcel.id && !r.applied)
                    .count() as i64,
            })
            .collect();

        Ok(summaries)
    }

    async fn find_parcel(&self, parcel_id: i32) -> AppResult<Option<Parcel>> {
        Ok(self.tables.read().await.parcels.get(&parcel_id).cloned())
    }

    async fn alerts_for_parcel(&self, parcel_id: i32) -> AppResult<Vec<DiseaseAlert>> {
        let tables = self.tables.read().await;
        let mut alerts: Vec<DiseaseAlert> = tables
            .alerts
            .iter()
            .filter(|a| a.parcel_id == parcel_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        Ok(alerts)
    }

    async fn pending_recommendations_for_parcel(
        &self,
        parcel_id: i32,
    ) -> AppResult<Vec<IrrigationRecommendation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .recommendations
            .iter()
            .filter(|r| r.parcel_id == parcel_id && !r.applied)
            .cloned()
            .collect())
    }

    async fn list_alerts(&self) -> AppResult<Vec<AlertListing>> {
        let tables = self.tables.read().await;

        let mut listings: Vec<AlertListing> = tables
            .alerts
            .iter()
            .filter_map(|alert| {
                let mut parcel = tables.parcel_ref(alert.parcel_id)?;
                parcel.area_ha = None;
                Some(AlertListing {
                    alert: alert.clone(),
                    parcel,
                })
            })
            .collect();
        listings.sort_by(|a, b| b.alert.detected_at.cmp(&a.alert.detected_at));

        Ok(listings)
    }

    async fn list_pending_recommendations(&self) -> AppResult<Vec<RecommendationListing>> {
        let tables = self.tables.read().await;

        Ok(tables
            .recommendations
            .iter()
            .filter(|r| !r.applied)
            .filter_map(|recommendation| {
                Some(RecommendationListing {
                    recommendation: recommendation.clone(),
                    parcel: tables.parcel_ref(recommendation.parcel_id)?,
                })
            })
            .collect())
    }

    async fn mark_recommendation_applied(
        &self,
        recommendation_id: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<IrrigationRecommendation>> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .recommendations
            .iter_mut()
            .find(|r| r.id == recommendation_id)
            .map(|recommendation| {
                recommendation.apply(at);
                recommendation.clone()
            }))
    }

    async fn parcel_aggregate(&self) -> AppResult<ParcelAggregate> {
        let tables = self.tables.read().await;
        let parcels = &tables.parcels;

        let count_category = |category: StressCategory| {
            parcels
                .values()
                .filter(|p| p.stress_category == category)
                .count() as i64
        };

        let parcel_count = parcels.len() as i64;
        let stress_sum: Decimal = parcels.values().map(|p| p.stress_level).sum();
        let mean_stress = (parcel_count > 0).then(|| stress_sum / Decimal::from(parcel_count));

        Ok(ParcelAggregate {
            parcel_count,
            total_area_ha: parcels.values().map(|p| p.area_ha).sum(),
            critical_count: count_category(StressCategory::Critical),
            moderate_count: count_category(StressCategory::Moderate),
            ok_count: count_category(StressCategory::Ok),
            mean_stress,
            water_demand: parcels
                .values()
                .map(|p| p.water_need_mm * p.area_ha)
                .sum(),
        })
    }

    async fn alert_aggregate(&self) -> AppResult<AlertAggregate> {
        let tables = self.tables.read().await;

        Ok(AlertAggregate {
            alert_count: tables.alerts.len() as i64,
            high_severity_count: tables
                .alerts
                .iter()
                .filter(|a| a.severity == AlertSeverity::High)
                .count() as i64,
        })
    }

    async fn recommendation_aggregate(&self) -> AppResult<RecommendationAggregate> {
        let tables = self.tables.read().await;
        let pending = tables.recommendations.iter().filter(|r| !r.applied);

        let (pending_count, urgent_count) = pending.fold((0, 0), |(all, urgent), r| {
            let is_urgent = r.priority == RecommendationPriority::Urgent;
            (all + 1, urgent + i64::from(is_urgent))
        });

        Ok(RecommendationAggregate {
            pending_count,
            urgent_count,
        })
    }

    async fn ping(&self) -> bool {
        true
    }
}
