//! AI irrigation recommendation service client (MS6)

use async_trait::async_trait;
use serde::Serialize;

use super::context::ParcelContext;
use super::upstream::{LivenessOutcome, UpstreamHttp, UpstreamOutcome, UpstreamService};

pub const SERVICE_NAME: &str = "MS6-Reco";

/// Constraint flag sent when the parcel is in the high-stress tier
pub const SEVERE_STRESS_CONSTRAINT: &str = "stress_hydrique_severe";

/// AI recommendation API client
#[derive(Clone)]
pub struct AiRecommendationClient {
    http: UpstreamHttp,
}

/// Request body of `/api/v1/irrigation/recommandation-ia`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AiRecommendationRequest {
    pub zone_id: i32,
    pub culture_type: String,
    pub prediction: PredictionBlock,
    pub regles: RuleSummary,
}

/// Forecast-derived inputs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionBlock {
    pub et0_mm_jour: f64,
    pub temperature_celsius: f64,
    pub humidite_pourcentage: f64,
    pub precipitation_mm: f64,
    pub stress_index: f64,
    pub temp_max_demain: f64,
    pub probabilite_pluie: f64,
    pub evapotranspiration_et0: f64,
}

/// Rule-derived inputs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleSummary {
    pub priorite: &'static str,
    pub stade_culture: String,
    pub contraintes: Vec<&'static str>,
    pub contrainte_hydrique: &'static str,
}

impl AiRecommendationRequest {
    pub fn from_context(parcel_id: i32, context: &ParcelContext) -> Self {
        let stress = context.stress();
        let profile = context.crop_profile();
        let et0 = profile.base_et0_mm + stress * 1.5;

        let contraintes = if context.priority == shared::PriorityTier::High {
            vec![SEVERE_STRESS_CONSTRAINT]
        } else {
            Vec::new()
        };

        Self {
            zone_id: parcel_id,
            culture_type: context.crop_type.clone(),
            prediction: PredictionBlock {
                et0_mm_jour: et0,
                temperature_celsius: profile.base_temperature_c,
                humidite_pourcentage: profile.base_humidity_pct - stress * 10.0,
                precipitation_mm: context.expected_precipitation_mm(),
                stress_index: stress,
                temp_max_demain: profile.base_temperature_c + 4.0,
                probabilite_pluie: context.rain_probability(),
                evapotranspiration_et0: et0,
            },
            regles: RuleSummary {
                priorite: context.priority.ai_rule_priority(),
                stade_culture: context.growth_stage.clone(),
                contraintes,
                contrainte_hydrique: context.priority.hydric_constraint(),
            },
        }
    }
}

impl AiRecommendationClient {
    pub fn new(http: UpstreamHttp) -> Self {
        Self { http }
    }

    /// Fetch past irrigation plans of a zone
    pub async fn irrigation_history(&self, parcel_id: i32) -> UpstreamOutcome {
        self.http
            .get_json(
                "/api/v1/irrigation/historique",
                &[("zone_id", parcel_id.to_string())],
            )
            .await
    }
}

#[async_trait]
impl UpstreamService for AiRecommendationClient {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn evaluate(&self, parcel_id: i32, context: &ParcelContext) -> UpstreamOutcome {
        let request = AiRecommendationRequest::from_context(parcel_id, context);
        tracing::debug!(
            "[{}] requesting recommendation for zone {} ({}, tier {:?})",
            SERVICE_NAME,
            parcel_id,
            request.culture_type,
            context.priority
        );
        self.http
            .post_json("/api/v1/irrigation/recommandation-ia", &request)
            .await
    }

    async fn liveness(&self) -> LivenessOutcome {
        self.http.liveness().await
    }
}
