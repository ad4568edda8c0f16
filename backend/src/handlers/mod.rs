//! HTTP handlers for the parcel monitoring dashboard

pub mod alert;
pub mod health;
pub mod parcel;
pub mod recommendation;
pub mod stats;
pub mod upstream;

pub use alert::list_alerts;
pub use health::{health_check, upstream_health};
pub use parcel::{get_enriched_parcel, get_parcel, get_water_status, list_parcels};
pub use recommendation::{apply_recommendation, list_recommendations};
pub use stats::get_stats;
pub use upstream::{
    get_ai_recommendations, get_forecast, get_irrigation_history, get_rules_evaluation,
    get_sensor_history,
};
