//! Parcel, alert and recommendation storage
//!
//! [`ParcelStore`] is the read/write contract the services depend on. The
//! PostgreSQL/PostGIS implementation serves production; the in-memory one
//! backs tests and local demos.

pub mod memory;
pub mod postgres;

pub use memory::MemoryParcelStore;
pub use postgres::PgParcelStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    AlertAggregate, AlertListing, DiseaseAlert, IrrigationRecommendation, Parcel,
    ParcelAggregate, ParcelSummary, RecommendationAggregate, RecommendationListing,
};

use crate::error::AppResult;

#[async_trait]
pub trait ParcelStore: Send + Sync {
    /// Every parcel with its alert count and unapplied recommendation count
    async fn parcel_summaries(&self) -> AppResult<Vec<ParcelSummary>>;

    async fn find_parcel(&self, parcel_id: i32) -> AppResult<Option<Parcel>>;

    async fn alerts_for_parcel(&self, parcel_id: i32) -> AppResult<Vec<DiseaseAlert>>;

    /// Unapplied recommendations of a parcel, in no particular order
    async fn pending_recommendations_for_parcel(
        &self,
        parcel_id: i32,
    ) -> AppResult<Vec<IrrigationRecommendation>>;

    /// Every alert with its parcel, newest first
    async fn list_alerts(&self) -> AppResult<Vec<AlertListing>>;

    /// Every unapplied recommendation with its parcel, in no particular order
    async fn list_pending_recommendations(&self) -> AppResult<Vec<RecommendationListing>>;

    /// Mark a recommendation applied. An already applied recommendation keeps
    /// its original timestamp. `None` when the id is unknown.
    async fn mark_recommendation_applied(
        &self,
        recommendation_id: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<IrrigationRecommendation>>;

    async fn parcel_aggregate(&self) -> AppResult<ParcelAggregate>;

    async fn alert_aggregate(&self) -> AppResult<AlertAggregate>;

    /// Aggregates over unapplied recommendations
    async fn recommendation_aggregate(&self) -> AppResult<RecommendationAggregate>;

    /// Whether the store answers at all
    async fn ping(&self) -> bool;
}
