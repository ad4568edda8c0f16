//! Shared fixtures for the backend integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parcel_dashboard_backend::config::{
    Config, CorsConfig, DatabaseConfig, ServerConfig, UpstreamConfig,
};
use parcel_dashboard_backend::external::{
    LivenessOutcome, ParcelContext, UpstreamOutcome, UpstreamService,
};
use parcel_dashboard_backend::services::EnrichmentOrchestrator;
use shared::{
    AlertSeverity, DiseaseAlert, IrrigationRecommendation, Parcel, RecommendationPriority,
    StressCategory,
};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, d, 8, 0, 0).unwrap()
}

// ============================================================================
// Fake upstream service
// ============================================================================

/// Scripted upstream service counting its evaluations
pub struct FakeService {
    name: &'static str,
    outcome: UpstreamOutcome,
    liveness: LivenessOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeService {
    pub fn answering(name: &'static str, body: Value) -> Self {
        Self {
            name,
            outcome: UpstreamOutcome::ok(body),
            liveness: LivenessOutcome::Responded {
                status: 200,
                body: Some(json!({ "status": "ok" })),
            },
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            outcome: UpstreamOutcome::unavailable("connection refused"),
            liveness: LivenessOutcome::Unreachable {
                reason: "connection refused".into(),
            },
            ..Self::answering(name, Value::Null)
        }
    }

    pub fn responding(name: &'static str, status: u16, body: Value) -> Self {
        Self {
            outcome: UpstreamOutcome::Available { status, body },
            ..Self::answering(name, Value::Null)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_liveness_status(mut self, status: u16) -> Self {
        self.liveness = LivenessOutcome::Responded { status, body: None };
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl UpstreamService for FakeService {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(&self, _parcel_id: i32, _context: &ParcelContext) -> UpstreamOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.outcome.clone()
    }

    async fn liveness(&self) -> LivenessOutcome {
        self.wait().await;
        self.liveness.clone()
    }
}

// ============================================================================
// Upstream payloads
// ============================================================================

pub fn vision_payload() -> Value {
    json!({ "status": "no_data", "message": "Vision analysis requires image upload" })
}

pub fn forecast_payload() -> Value {
    json!({
        "capteur_id": "sensor_p1",
        "model": "ensemble",
        "points": [{ "timestamp": "2025-06-02", "hydric_stress": 0.61 }],
        "forecast": { "trend": "increasing" }
    })
}

pub fn rules_payload() -> Value {
    json!({
        "priorite_irrigation": "HAUTE",
        "recommendations": [{ "rule_id": "R-SOIL-01", "priority": "high" }],
        "triggered_rules_count": 1
    })
}

pub fn ai_payload() -> Value {
    json!({
        "volume_eau_m3": 12.5,
        "duree_minutes": 40,
        "status": "generated",
        "justification_agronomique": "Humidite du sol basse"
    })
}

/// Orchestrator over four fake services
pub fn orchestrator(
    services: [Arc<FakeService>; 4],
    call_timeout: Duration,
) -> EnrichmentOrchestrator {
    let [vision, water, rules, ai] = services;
    EnrichmentOrchestrator::new(vision, water, rules, ai, call_timeout)
}

/// Orchestrator whose services are all down
pub fn offline_orchestrator() -> EnrichmentOrchestrator {
    orchestrator(
        [
            Arc::new(FakeService::failing("MS3-Vision")),
            Arc::new(FakeService::failing("MS4-Prevision")),
            Arc::new(FakeService::failing("MS5-Regles")),
            Arc::new(FakeService::failing("MS6-Reco")),
        ],
        Duration::from_secs(1),
    )
}

// ============================================================================
// Records
// ============================================================================

pub fn parcel(id: i32, stress: &str) -> Parcel {
    let level = dec(stress);
    Parcel {
        id,
        name: format!("Parcelle {}", id),
        crop_type: "Tomate".into(),
        area_ha: dec("2.5"),
        sowing_date: None,
        stress_level: level,
        stress_category: StressCategory::from_level(level),
        water_need_mm: dec("10"),
        last_irrigation: Some(day(1)),
        geometry: json!({
            "type": "Polygon",
            "coordinates": [[[-7.6, 33.5], [-7.5, 33.5], [-7.5, 33.6], [-7.6, 33.5]]]
        }),
    }
}

pub fn alert(id: i32, parcel_id: i32, severity: AlertSeverity, d: u32) -> DiseaseAlert {
    DiseaseAlert {
        id,
        parcel_id,
        disease_type: "Mildiou".into(),
        severity,
        confidence: dec("0.87"),
        detected_at: day(d),
        description: None,
    }
}

pub fn recommendation(
    id: i32,
    parcel_id: i32,
    priority: RecommendationPriority,
    d: u32,
) -> IrrigationRecommendation {
    IrrigationRecommendation {
        id,
        parcel_id,
        volume_mm: dec("25.0"),
        duration_minutes: 45,
        optimal_time: None,
        priority,
        recommended_at: day(d),
        applied: false,
        applied_at: None,
    }
}

/// Configuration pointing every upstream at a closed local port
pub fn offline_config() -> Config {
    let closed = "http://127.0.0.1:9".to_string();
    Config {
        environment: "test".into(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".into(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_secs: 1,
        },
        upstreams: UpstreamConfig {
            vision_url: closed.clone(),
            forecast_url: closed.clone(),
            rules_url: closed.clone(),
            ai_url: closed,
            request_timeout_secs: 2,
            health_timeout_secs: 1,
        },
        cors: CorsConfig {
            allowed_origin: "*".into(),
        },
    }
}
