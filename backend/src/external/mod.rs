//! Upstream analytic service integrations

pub mod agro_rules;
pub mod ai_recommendation;
pub mod context;
pub mod upstream;
pub mod vision;
pub mod water_forecast;

pub use agro_rules::RuleEvaluationClient;
pub use ai_recommendation::AiRecommendationClient;
pub use context::ParcelContext;
pub use upstream::{LivenessOutcome, UpstreamHttp, UpstreamOutcome, UpstreamService};
pub use vision::VisionClient;
pub use water_forecast::WaterForecastClient;

use std::sync::Arc;

use crate::config::UpstreamConfig;

/// The four upstream clients, built once at startup
#[derive(Clone)]
pub struct UpstreamClients {
    pub vision: Arc<VisionClient>,
    pub water: Arc<WaterForecastClient>,
    pub rules: Arc<RuleEvaluationClient>,
    pub ai: Arc<AiRecommendationClient>,
}

impl UpstreamClients {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let http = |service: &'static str, url: &str| {
            UpstreamHttp::new(
                service,
                url,
                config.request_timeout(),
                config.health_timeout(),
            )
        };

        Self {
            vision: Arc::new(VisionClient::new(http(
                vision::SERVICE_NAME,
                &config.vision_url,
            ))),
            water: Arc::new(WaterForecastClient::new(http(
                water_forecast::SERVICE_NAME,
                &config.forecast_url,
            ))),
            rules: Arc::new(RuleEvaluationClient::new(http(
                agro_rules::SERVICE_NAME,
                &config.rules_url,
            ))),
            ai: Arc::new(AiRecommendationClient::new(http(
                ai_recommendation::SERVICE_NAME,
                &config.ai_url,
            ))),
        }
    }

    /// All clients in probe order
    pub fn all(&self) -> Vec<Arc<dyn UpstreamService>> {
        vec![
            self.vision.clone() as Arc<dyn UpstreamService>,
            self.water.clone() as Arc<dyn UpstreamService>,
            self.rules.clone() as Arc<dyn UpstreamService>,
            self.ai.clone() as Arc<dyn UpstreamService>,
        ]
    }
}
