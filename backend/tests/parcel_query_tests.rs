//! Parcel query tests for the parcel monitoring dashboard
//!
//! Listing, detail, recommendation application and statistics against the
//! in-memory store.

mod common;

use serde_json::json;
use std::sync::Arc;

use common::*;
use parcel_dashboard_backend::error::AppError;
use parcel_dashboard_backend::services::ParcelQueryService;
use parcel_dashboard_backend::store::MemoryParcelStore;
use shared::{AlertSeverity, RecommendationPriority, StressCategory};

fn service(store: Arc<MemoryParcelStore>) -> ParcelQueryService {
    ParcelQueryService::new(store, Arc::new(offline_orchestrator()))
}

async fn seeded_store() -> Arc<MemoryParcelStore> {
    let store = Arc::new(MemoryParcelStore::new());
    store.insert_parcel(parcel(1, "0.82")).await;
    store.insert_parcel(parcel(2, "0.48")).await;
    store.insert_parcel(parcel(3, "0.15")).await;

    store.insert_alert(alert(1, 1, AlertSeverity::High, 3)).await;
    store.insert_alert(alert(2, 1, AlertSeverity::Low, 5)).await;
    store.insert_alert(alert(3, 2, AlertSeverity::Medium, 4)).await;

    store
        .insert_recommendation(recommendation(1, 1, RecommendationPriority::Normal, 2))
        .await;
    let mut applied = recommendation(2, 1, RecommendationPriority::Urgent, 3);
    applied.apply(day(4));
    store.insert_recommendation(applied).await;
    store
        .insert_recommendation(recommendation(3, 2, RecommendationPriority::High, 1))
        .await;
    store
        .insert_recommendation(recommendation(4, 2, RecommendationPriority::Urgent, 2))
        .await;
    store
        .insert_recommendation(recommendation(5, 2, RecommendationPriority::High, 6))
        .await;

    store
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_parcels_counts() {
    let query = service(seeded_store().await);

    let collection = query.list_parcels().await.unwrap();
    assert_eq!(collection.len(), 3);

    let first = &collection.features[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.properties.nb_alertes, 2);
    assert_eq!(first.properties.nb_recommandations, 1);

    let third = &collection.features[2];
    assert_eq!(third.properties.nb_alertes, 0);
    assert_eq!(third.properties.nb_recommandations, 0);
}

#[tokio::test]
async fn test_list_parcels_geojson_shape() {
    let query = service(seeded_store().await);

    let value = serde_json::to_value(query.list_parcels().await.unwrap()).unwrap();

    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][0]["type"], "Feature");
    assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
    assert_eq!(value["features"][0]["properties"]["stress_hydrique"], "CRITIQUE");
    assert_eq!(value["features"][0]["properties"]["nb_alertes"], 2);
}

#[tokio::test]
async fn test_empty_store_lists_no_features() {
    let query = service(Arc::new(MemoryParcelStore::new()));

    let collection = query.list_parcels().await.unwrap();
    assert!(collection.is_empty());

    let value = serde_json::to_value(collection).unwrap();
    assert_eq!(value["features"], json!([]));
}

#[tokio::test]
async fn test_alerts_newest_first() {
    let query = service(seeded_store().await);

    let alerts = query.list_alerts().await.unwrap();
    let ids: Vec<i32> = alerts.iter().map(|a| a.alert.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let value = serde_json::to_value(&alerts[0]).unwrap();
    assert_eq!(value["parcelle"]["nom"], "Parcelle 1");
    assert!(value["parcelle"].get("superficie_ha").is_none());
    assert_eq!(value["severite"], "FAIBLE");
}

#[tokio::test]
async fn test_pending_recommendations_ordering() {
    let query = service(seeded_store().await);

    let recommendations = query.list_pending_recommendations().await.unwrap();
    let ids: Vec<i32> = recommendations.iter().map(|r| r.recommendation.id).collect();

    // Applied recommendation 2 is excluded; urgent first, then high by recency
    assert_eq!(ids, vec![4, 5, 3, 1]);
    assert_eq!(recommendations[0].parcel.area_ha, Some(dec("2.5")));
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_parcel_detail() {
    let query = service(seeded_store().await);

    let detail = query.get_parcel_detail(2, false).await.unwrap();

    assert_eq!(detail.parcel.id, 2);
    assert_eq!(detail.parcel.stress_category, StressCategory::Moderate);
    assert_eq!(detail.alerts.len(), 1);
    let ids: Vec<i32> = detail.recommendations.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 5, 3]);
    assert!(detail.enrichment.is_none());

    let value = serde_json::to_value(&detail).unwrap();
    assert!(value.get("upstream_data").is_none());
    assert_eq!(value["alertes"].as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn test_parcel_detail_with_enrichment() {
    let query = service(seeded_store().await);

    let detail = query.get_parcel_detail(1, true).await.unwrap();
    let value = serde_json::to_value(&detail).unwrap();

    // Every upstream is down: slots are present and null
    assert_eq!(value["upstream_data"]["water_prediction"], json!(null));
    assert_eq!(value["nom"], "Parcelle 1");
}

#[tokio::test]
async fn test_unknown_parcel() {
    let query = service(seeded_store().await);

    let err = query.get_parcel_detail(42, false).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = query.get_enriched_parcel(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_enriched_parcel_keeps_base_fields() {
    let query = service(seeded_store().await);

    let enriched = query.get_enriched_parcel(3).await.unwrap();

    assert_eq!(enriched.parcel, parcel(3, "0.15"));
    assert!(enriched.is_enriched());
}

// ============================================================================
// Recommendation application
// ============================================================================

#[tokio::test]
async fn test_apply_twice_is_idempotent() {
    let query = service(seeded_store().await);

    let first = query.mark_recommendation_applied(1).await.unwrap();
    let second = query.mark_recommendation_applied(1).await.unwrap();

    assert!(first.applied);
    assert!(second.applied);
    assert!(first.applied_at.is_some());
    assert_eq!(first.applied_at, second.applied_at);

    let collection = query.list_parcels().await.unwrap();
    assert_eq!(collection.features[0].properties.nb_recommandations, 0);
}

#[tokio::test]
async fn test_apply_keeps_original_timestamp() {
    let query = service(seeded_store().await);

    let recommendation = query.mark_recommendation_applied(2).await.unwrap();
    assert_eq!(recommendation.applied_at, Some(day(4)));
}

#[tokio::test]
async fn test_apply_unknown_recommendation() {
    let query = service(seeded_store().await);

    let err = query.mark_recommendation_applied(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============================================================================
// Water status
// ============================================================================

#[tokio::test]
async fn test_water_status_most_stressed_first() {
    let query = service(seeded_store().await);

    let report = query.water_status().await.unwrap();

    assert_eq!(report.count, 3);
    let ids: Vec<i32> = report.parcelles.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(report.parcelles[0].donnees_drone.ndvi, dec("0.59"));
}

#[tokio::test]
async fn test_water_status_category_counts() {
    let store = seeded_store().await;
    store.insert_parcel(parcel(4, "0.91")).await;
    let query = service(store);

    let report = query.water_status().await.unwrap();

    assert_eq!(report.parcelles[0].id, 4);
    assert_eq!(report.statistiques.critique, 2);
    assert_eq!(report.statistiques.modere, 1);
    assert_eq!(report.statistiques.ok, 1);
}

#[tokio::test]
async fn test_water_status_on_empty_store() {
    let query = service(Arc::new(MemoryParcelStore::new()));

    let report = query.water_status().await.unwrap();

    assert_eq!(report.count, 0);
    assert!(report.parcelles.is_empty());
}

// ============================================================================
// Statistics
// ============================================================================

#[tokio::test]
async fn test_stats_fixture() {
    let query = service(seeded_store().await);

    let stats = query.compute_aggregate_stats().await.unwrap();

    assert_eq!(stats.total_parcelles, 3);
    assert_eq!(stats.parcelles_critiques, 1);
    assert_eq!(stats.parcelles_moderees, 1);
    assert_eq!(stats.parcelles_ok, 1);
    assert_eq!(stats.stress_moyen, Some(dec("0.48")));
    assert_eq!(stats.superficie_totale, dec("7.5"));
    // 3 parcels x 10 mm x 2.5 ha
    assert_eq!(stats.volume_eau_total_mm, dec("75"));
    assert_eq!(stats.total_alertes, 3);
    assert_eq!(stats.alertes_elevees, 1);
    assert_eq!(stats.total_recommandations, 4);
    assert_eq!(stats.reco_urgentes, 1);
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let query = service(Arc::new(MemoryParcelStore::new()));

    let stats = query.compute_aggregate_stats().await.unwrap();

    assert_eq!(stats.total_parcelles, 0);
    assert_eq!(stats.stress_moyen, None);
    assert_eq!(stats.volume_eau_total_mm, dec("0"));
    assert_eq!(stats.total_recommandations, 0);
}

#[tokio::test]
async fn test_stats_mean_midpoint_rounds_up() {
    let store = Arc::new(MemoryParcelStore::new());
    store.insert_parcel(parcel(1, "0.10")).await;
    store.insert_parcel(parcel(2, "0.15")).await;
    let query = service(store);

    let stats = query.compute_aggregate_stats().await.unwrap();

    assert_eq!(stats.stress_moyen, Some(dec("0.13")));
}
