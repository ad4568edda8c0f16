//! Business logic services for the parcel monitoring dashboard

pub mod enrichment;
pub mod health_probe;
pub mod parcel_query;

pub use enrichment::EnrichmentOrchestrator;
pub use health_probe::{HealthProbe, HealthReport, ServiceHealth, ServiceStatus};
pub use parcel_query::ParcelQueryService;
