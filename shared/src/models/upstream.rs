//! Response schemas of the upstream analytic services
//!
//! Each schema declares only the fields the dashboard reads. Everything else
//! in a payload is ignored, and the raw payload itself is kept untouched in
//! [`UpstreamData`]. The mapping from raw payloads to the dashboard's
//! quick-access fields lives in [`UpstreamHighlights::extract`] and nowhere
//! else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw payloads returned by the four upstream services for one parcel.
///
/// A `None` slot means the service was unavailable for this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpstreamData {
    pub vision: Option<Value>,
    pub water_prediction: Option<Value>,
    pub agro_rules: Option<Value>,
    pub ai_recommendations: Option<Value>,
}

/// Water forecast service response (`/forecasts/with-recommendations`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WaterForecastResponse {
    pub forecast: Option<ForecastSummary>,
}

/// Multi-day forecast summary
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForecastSummary {
    pub trend: Option<String>,
}

/// Agronomic rule evaluation response (`/evaluate`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleEvaluationResponse {
    pub priorite_irrigation: Option<String>,
}

/// AI irrigation recommendation response (`/api/v1/irrigation/recommandation-ia`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiRecommendationResponse {
    pub volume_eau_m3: Option<f64>,
    pub duree_minutes: Option<i64>,
    pub justification_agronomique: Option<String>,
    /// Older responses nest the justification under `analyse`
    pub analyse: Option<AiAnalysis>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub justification: Option<String>,
}

/// A payload slot whose extracted fields could not be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDecodeError {
    pub slot: &'static str,
    pub message: String,
}

/// Quick-access fields extracted from the upstream payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpstreamHighlights {
    pub ai_irrigation_volume: Option<f64>,
    pub ai_irrigation_duration: Option<i64>,
    pub ai_reasoning: Option<String>,
    pub forecast_stress_trend: Option<String>,
    pub rules_priority: Option<String>,
}

impl UpstreamHighlights {
    /// Extract quick-access fields from the available payloads.
    ///
    /// Missing payloads and missing fields yield `None`. A slot whose
    /// extracted fields carry the wrong JSON type yields `None` for that
    /// slot's fields only and is reported in the returned error list.
    pub fn extract(data: &UpstreamData) -> (Self, Vec<SlotDecodeError>) {
        let mut errors = Vec::new();

        let ai = parse_slot::<AiRecommendationResponse>(
            "ai_recommendations",
            data.ai_recommendations.as_ref(),
            &mut errors,
        );
        let water = parse_slot::<WaterForecastResponse>(
            "water_prediction",
            data.water_prediction.as_ref(),
            &mut errors,
        );
        let rules =
            parse_slot::<RuleEvaluationResponse>("agro_rules", data.agro_rules.as_ref(), &mut errors);

        let ai_reasoning = ai.as_ref().and_then(|a| {
            a.analyse
                .as_ref()
                .and_then(|analyse| analyse.justification.clone())
                .or_else(|| a.justification_agronomique.clone())
        });

        let highlights = Self {
            ai_irrigation_volume: ai.as_ref().and_then(|a| a.volume_eau_m3),
            ai_irrigation_duration: ai.as_ref().and_then(|a| a.duree_minutes),
            ai_reasoning,
            forecast_stress_trend: water.and_then(|w| w.forecast).and_then(|f| f.trend),
            rules_priority: rules.and_then(|r| r.priorite_irrigation),
        };

        (highlights, errors)
    }
}

fn parse_slot<T>(
    slot: &'static str,
    payload: Option<&Value>,
    errors: &mut Vec<SlotDecodeError>,
) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    match payload {
        // An explicit JSON null body carries nothing to extract
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(SlotDecodeError {
                    slot,
                    message: e.to_string(),
                });
                None
            }
        },
    }
}
