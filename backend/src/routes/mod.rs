//! Route definitions for the parcel monitoring dashboard

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/microservices/health", get(handlers::upstream_health))
        .route("/stats", get(handlers::get_stats))
        .nest("/parcels", parcel_routes())
        .nest("/parcelles", parcel_routes())
        .route("/water-status", get(handlers::get_water_status))
        .route("/etat-hydrique", get(handlers::get_water_status))
        .route("/sensors/:sensor_id/history", get(handlers::get_sensor_history))
        .route("/alerts", get(handlers::list_alerts))
        .route("/alertes", get(handlers::list_alerts))
        .nest("/recommendations", recommendation_routes("apply"))
        .nest("/recommandations", recommendation_routes("appliquer"))
}

/// Parcel routes
fn parcel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_parcels))
        .route("/:id", get(handlers::get_parcel))
        .route("/:id/enriched", get(handlers::get_enriched_parcel))
        .route("/:id/forecast", get(handlers::get_forecast))
        .route("/:id/rules-evaluation", get(handlers::get_rules_evaluation))
        .route("/:id/ai-recommendations", get(handlers::get_ai_recommendations))
        .route("/:id/irrigation-history", get(handlers::get_irrigation_history))
}

/// Recommendation routes, with the apply action under the given verb
fn recommendation_routes(apply_verb: &str) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_recommendations))
        .route(
            &format!("/:id/{}", apply_verb),
            post(handlers::apply_recommendation),
        )
}
