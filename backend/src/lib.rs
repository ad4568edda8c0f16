//! Parcel monitoring dashboard backend
//!
//! Serves parcels, disease alerts, irrigation recommendations and statistics
//! from a PostGIS store, and enriches parcels with the answers of four
//! upstream analytic services (vision, water forecast, agronomic rules, AI
//! recommendation).

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use external::UpstreamClients;
use services::{EnrichmentOrchestrator, HealthProbe, ParcelQueryService};
use store::ParcelStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub query: ParcelQueryService,
    pub probe: HealthProbe,
    pub clients: UpstreamClients,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the services around a store, with upstream clients built from
    /// the configuration
    pub fn new(store: Arc<dyn ParcelStore>, config: Arc<Config>) -> Self {
        let clients = UpstreamClients::from_config(&config.upstreams);
        let orchestrator = Arc::new(EnrichmentOrchestrator::from_clients(
            &clients,
            config.upstreams.request_timeout(),
        ));

        Self {
            query: ParcelQueryService::new(store, orchestrator),
            probe: HealthProbe::new(clients.all(), config.upstreams.health_timeout()),
            clients,
            config,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&state.config.cors.allowed_origin))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn allowed_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        return AllowOrigin::any();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            AllowOrigin::any()
        }
    }
}

/// Root endpoint
async fn root() -> &'static str {
    "Parcel Monitoring Dashboard API"
}
