//! Parcel, alert, recommendation and statistics queries

use chrono::Utc;
use std::sync::Arc;

use shared::{
    display_order, sort_for_display, AlertListing, DashboardStats, EnrichedParcel, Feature,
    FeatureCollection, IrrigationRecommendation, Parcel, ParcelDetail, RecommendationListing,
    WaterStatusReport,
};

use super::EnrichmentOrchestrator;
use crate::error::{AppError, AppResult};
use crate::store::ParcelStore;

/// Read side of the dashboard plus the recommendation state transition
#[derive(Clone)]
pub struct ParcelQueryService {
    store: Arc<dyn ParcelStore>,
    orchestrator: Arc<EnrichmentOrchestrator>,
}

impl ParcelQueryService {
    pub fn new(store: Arc<dyn ParcelStore>, orchestrator: Arc<EnrichmentOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }

    /// Every parcel as a GeoJSON feature with its alert and pending
    /// recommendation counts
    pub async fn list_parcels(&self) -> AppResult<FeatureCollection> {
        let summaries = self.store.parcel_summaries().await?;
        tracing::debug!("Listing {} parcels", summaries.len());
        Ok(summaries.into_iter().map(Feature::from).collect())
    }

    /// Water status of every parcel, most stressed first, with per-category
    /// counts
    pub async fn water_status(&self) -> AppResult<WaterStatusReport> {
        let summaries = self.store.parcel_summaries().await?;
        Ok(WaterStatusReport::build(
            summaries.iter().map(|s| &s.parcel),
            Utc::now(),
        ))
    }

    /// Get a parcel or fail with `NotFound`
    pub async fn get_parcel(&self, parcel_id: i32) -> AppResult<Parcel> {
        self.store
            .find_parcel(parcel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Parcel {}", parcel_id)))
    }

    /// Parcel with its alerts and pending recommendations, optionally
    /// enriched with upstream data
    pub async fn get_parcel_detail(&self, parcel_id: i32, enrich: bool) -> AppResult<ParcelDetail> {
        let parcel = self.get_parcel(parcel_id).await?;
        let alerts = self.store.alerts_for_parcel(parcel_id).await?;
        let mut recommendations = self
            .store
            .pending_recommendations_for_parcel(parcel_id)
            .await?;
        sort_for_display(&mut recommendations);

        let enrichment = if enrich {
            self.orchestrator.enrichment_for(&parcel).await
        } else {
            None
        };

        Ok(ParcelDetail {
            parcel,
            alerts,
            recommendations,
            enrichment,
        })
    }

    pub async fn get_enriched_parcel(&self, parcel_id: i32) -> AppResult<EnrichedParcel> {
        let parcel = self.get_parcel(parcel_id).await?;
        Ok(self.orchestrator.enrich(parcel).await)
    }

    /// Mark a recommendation applied. Applying twice keeps the first
    /// application time.
    pub async fn mark_recommendation_applied(
        &self,
        recommendation_id: i32,
    ) -> AppResult<IrrigationRecommendation> {
        let recommendation = self
            .store
            .mark_recommendation_applied(recommendation_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Recommendation {}", recommendation_id)))?;

        tracing::info!(
            "Recommendation {} applied on parcel {}",
            recommendation.id,
            recommendation.parcel_id
        );

        Ok(recommendation)
    }

    /// Global statistics from three independent reads
    pub async fn compute_aggregate_stats(&self) -> AppResult<DashboardStats> {
        let (parcels, alerts, recommendations) = tokio::try_join!(
            self.store.parcel_aggregate(),
            self.store.alert_aggregate(),
            self.store.recommendation_aggregate(),
        )?;

        Ok(DashboardStats::combine(
            parcels,
            alerts,
            recommendations,
            Utc::now(),
        ))
    }

    /// Every alert, newest first
    pub async fn list_alerts(&self) -> AppResult<Vec<AlertListing>> {
        self.store.list_alerts().await
    }

    /// Pending recommendations, most urgent first then most recent first
    pub async fn list_pending_recommendations(&self) -> AppResult<Vec<RecommendationListing>> {
        let mut listings = self.store.list_pending_recommendations().await?;
        listings.sort_by(|a, b| display_order(&a.recommendation, &b.recommendation));
        Ok(listings)
    }

    /// Whether the store answers
    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await
    }
}
