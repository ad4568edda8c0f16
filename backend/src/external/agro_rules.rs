//! Agronomic rule evaluation service client (MS5)

use async_trait::async_trait;
use serde::Serialize;

use super::context::ParcelContext;
use super::upstream::{LivenessOutcome, UpstreamHttp, UpstreamOutcome, UpstreamService};

pub const SERVICE_NAME: &str = "MS5-Regles";

/// Rule evaluation API client
#[derive(Clone)]
pub struct RuleEvaluationClient {
    http: UpstreamHttp,
}

/// Request body of `/evaluate`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleEvaluationRequest {
    pub parcelle_id: String,
    pub culture_type: String,
    pub superficie_ha: f64,
    pub stress_hydrique_actuel: f64,
    pub derniere_irrigation_jours: i64,
    pub stade_culture: String,
    pub temperature: f64,
    pub humidite: f64,
    pub humidite_sol: f64,
    pub meteo_prevision: WeatherOutlook,
}

/// Short-range weather summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherOutlook {
    pub temperature_moy: f64,
    pub precipitation_mm: f64,
    pub et0_mm: f64,
}

impl RuleEvaluationRequest {
    /// Shape the parcel context into the rule service contract.
    ///
    /// Higher stress means a hotter, drier outlook and drier soil.
    pub fn from_context(parcel_id: i32, context: &ParcelContext) -> Self {
        let stress = context.stress();
        let profile = context.crop_profile();

        Self {
            parcelle_id: parcel_id.to_string(),
            culture_type: context.crop_type.clone(),
            superficie_ha: context.area(),
            stress_hydrique_actuel: stress,
            derniere_irrigation_jours: context.days_since_irrigation,
            stade_culture: context.growth_stage.clone(),
            temperature: profile.base_temperature_c + stress * 8.0,
            humidite: profile.base_humidity_pct - stress * 15.0,
            humidite_sol: context.soil_moisture(),
            meteo_prevision: WeatherOutlook {
                temperature_moy: profile.base_temperature_c + stress * 5.0,
                precipitation_mm: context.expected_precipitation_mm(),
                et0_mm: 4.0 + stress * 3.0,
            },
        }
    }
}

impl RuleEvaluationClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UpstreamService for RuleEvaluationClient {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn evaluate(&self, parcel_id: i32, context: &ParcelContext) -> UpstreamOutcome {
        let request = RuleEvaluationRequest::from_context(parcel_id, context);
        self.http.post_json("/evaluate", &request).await
    }

    async fn liveness(&self) -> LivenessOutcome {
        self.http.liveness().await
    }
}
